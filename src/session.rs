// Form login. The site hands out its CSRF token as a cookie and expects
// it back as a form field on every POST, both for the login form and for
// the AJAX scheduling calls made afterwards.

use anyhow::{Context, Result};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::config::Site;
use crate::forms::find_form;
use crate::transport::{Page, Transport};

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
pub const DEFAULT_CSRF_PATH: &str = "/set_csrf_token";

/// Fatal login problems. Nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("no login form found on {url}")]
    FormNotFound { url: String },
    #[error("no form named {name:?} on {url}")]
    NamedFormNotFound { url: String, name: String },
    #[error("the server did not set a `{cookie}` cookie for {url}")]
    MissingCsrfCookie { url: String, cookie: &'static str },
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Login form `name`; the first form on the page when `None`.
    pub form_name: Option<String>,
    pub csrf_path: String,
}

impl Default for LoginOptions {
    fn default() -> Self {
        LoginOptions {
            form_name: None,
            csrf_path: DEFAULT_CSRF_PATH.to_string(),
        }
    }
}

/// A logged-in client. Lives for one run; nothing is persisted.
pub struct Session<T: Transport> {
    transport: T,
    site: Site,
}

impl<T: Transport> Session<T> {
    /// Prime the CSRF cookie, fill in the login form and submit it.
    ///
    /// Any non-error status from the submit counts as a successful login;
    /// the returned page is not inspected.
    pub fn login(transport: T, site: Site, credentials: &Credentials, options: &LoginOptions) -> Result<Self> {
        let priming = site.url(&options.csrf_path);
        transport
            .get(&priming)
            .with_context(|| format!("Failed to fetch CSRF token from {}", priming))?;

        let root = site.root();
        let page = transport.get(&root).context("Failed to open login page")?;

        let mut form = find_form(&page.text(), options.form_name.as_deref())?.ok_or_else(|| {
            match &options.form_name {
                Some(name) => LoginError::NamedFormNotFound {
                    url: page.url.clone(),
                    name: name.clone(),
                },
                None => LoginError::FormNotFound { url: page.url.clone() },
            }
        })?;
        debug!(form = ?form.name, action = ?form.action, "found login form");

        let session = Session { transport, site };
        let token = session.csrf_token()?;

        form.set(CSRF_FIELD, &token);
        form.set("username", &credentials.username);
        form.set("password", &credentials.password);

        let action = form.action_url(&page.url)?;
        session
            .transport
            .post_form(&action, &page.url, &form.fields)
            .context("Failed to submit login form")?;

        debug!(host = session.site.host(), user = %credentials.username, "logged in");
        Ok(session)
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current CSRF token. Read fresh each time since the server rotates
    /// it on login.
    pub fn csrf_token(&self) -> Result<String> {
        let root = self.site.root();
        match self.transport.cookie(&root, CSRF_COOKIE) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(LoginError::MissingCsrfCookie {
                url: root,
                cookie: CSRF_COOKIE,
            }
            .into()),
        }
    }

    pub fn get(&self, url: &str) -> Result<Page> {
        self.transport.get(url)
    }

    /// POST with the site root as referer.
    pub fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<Page> {
        self.transport.post_form(url, &self.site.root(), fields)
    }
}
