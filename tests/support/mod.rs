// In-memory stand-in for the network. Routes map a URL to a canned
// response; every request is recorded so tests can check what was sent.
#![allow(dead_code)]

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashMap;

use esp_schedule_tools::config::{Scheme, Site};
use esp_schedule_tools::session::{Credentials, LoginOptions, Session};
use esp_schedule_tools::transport::{Page, Transport};

pub const HOST: &str = "esp.test";
pub const TOKEN: &str = "s3cr3t-token";

pub const LOGIN_PAGE: &str = r#"
<html><body>
  <form name="loginform" action="/myesp/login/" method="post">
    <input type="hidden" name="next" value="/">
    <input type="text" name="username">
    <input type="password" name="password">
    <input type="submit" value="Log in">
  </form>
</body></html>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get(String),
    Post {
        url: String,
        referer: String,
        fields: Vec<(String, String)>,
    },
}

#[derive(Clone)]
struct Route {
    status: u16,
    body: Vec<u8>,
    set_cookies: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, Route>,
    cookies: RefCell<HashMap<String, String>>,
    requests: RefCell<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                body: body.into(),
                set_cookies: Vec::new(),
            },
        );
        self
    }

    /// Hitting `url` sets cookie `name=value`. The route must exist.
    pub fn sets_cookie(mut self, url: &str, name: &str, value: &str) -> Self {
        if let Some(route) = self.routes.get_mut(url) {
            route.set_cookies.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn posts(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|req| match req {
                Request::Post { url, fields, .. } => Some((url.clone(), fields.clone())),
                Request::Get(_) => None,
            })
            .collect()
    }

    fn respond(&self, url: &str) -> Result<Page> {
        let Some(route) = self.routes.get(url) else {
            bail!("HTTP status client error (404 Not Found) for url ({})", url);
        };
        for (name, value) in &route.set_cookies {
            self.cookies.borrow_mut().insert(name.clone(), value.clone());
        }
        if route.status >= 400 {
            bail!("HTTP status error ({}) for url ({})", route.status, url);
        }
        Ok(Page {
            url: url.to_string(),
            status: route.status,
            body: route.body.clone(),
        })
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<Page> {
        self.requests.borrow_mut().push(Request::Get(url.to_string()));
        self.respond(url)
    }

    fn post_form(&self, url: &str, referer: &str, fields: &[(String, String)]) -> Result<Page> {
        self.requests.borrow_mut().push(Request::Post {
            url: url.to_string(),
            referer: referer.to_string(),
            fields: fields.to_vec(),
        });
        self.respond(url)
    }

    fn cookie(&self, _url: &str, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).cloned()
    }
}

pub fn site() -> Site {
    Site::new(Scheme::Https, HOST)
}

pub fn url(path: &str) -> String {
    site().url(path)
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "hunter2".to_string(),
    }
}

/// A site whose login flow works end to end.
pub fn login_site() -> FakeTransport {
    FakeTransport::new()
        .route(&url("/set_csrf_token"), 200, "")
        .sets_cookie(&url("/set_csrf_token"), "csrftoken", TOKEN)
        .route(&url("/"), 200, LOGIN_PAGE)
        .route(&url("/myesp/login/"), 200, "welcome")
}

pub fn logged_in(transport: FakeTransport) -> Session<FakeTransport> {
    Session::login(transport, site(), &credentials(), &LoginOptions::default()).unwrap()
}

pub fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
