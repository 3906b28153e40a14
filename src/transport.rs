// Transport module: a small blocking HTTP client that keeps a cookie jar
// for the lifetime of one run. Login, fetch and upload only ever see the
// `Transport` trait, which lets the tests replace the network with a fake.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::REFERER;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A response that has been read to the end.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL, after redirects have been followed.
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Page {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// What the workflows need from an HTTP client.
///
/// Implementations must treat 4xx/5xx statuses as errors; any other
/// status is handed back as a `Page`.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Page>;

    /// POST `fields` URL-encoded. `referer` is sent along because the
    /// site rejects CSRF-protected posts over https without one.
    fn post_form(&self, url: &str, referer: &str, fields: &[(String, String)]) -> Result<Page>;

    /// Value of the cookie `name` that would be sent to `url`.
    fn cookie(&self, url: &str, name: &str) -> Option<String>;
}

/// reqwest-backed transport. Holds the client together with the jar it
/// writes to, so cookie values can be read back by name.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpTransport { client, jar })
    }

    fn read(res: Response, url: &str) -> Result<Page> {
        let res = res
            .error_for_status()
            .with_context(|| format!("Request to {} failed", url))?;
        let final_url = res.url().to_string();
        let status = res.status().as_u16();
        let body = res
            .bytes()
            .with_context(|| format!("Failed to read response body from {}", url))?;
        Ok(Page {
            url: final_url,
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Page> {
        debug!(%url, "GET");
        let res = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;
        Self::read(res, url)
    }

    fn post_form(&self, url: &str, referer: &str, fields: &[(String, String)]) -> Result<Page> {
        debug!(%url, fields = fields.len(), "POST");
        let res = self
            .client
            .post(url)
            .header(REFERER, referer)
            .form(fields)
            .send()
            .with_context(|| format!("Failed to send form to {}", url))?;
        Self::read(res, url)
    }

    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let header = self.jar.cookies(&url)?;
        cookie_value(header.to_str().ok()?, name)
    }
}

/// Pick one value out of a `Cookie:` header (`a=1; b=2`).
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_named_pair() {
        let header = "sessionid=abc; csrftoken=T0k3n; other=x";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("T0k3n"));
        assert_eq!(cookie_value(header, "sessionid").as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_value_does_not_match_prefixes() {
        assert_eq!(cookie_value("xcsrftoken=nope", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn jar_cookies_are_readable_by_name() {
        let transport = HttpTransport::new().unwrap();
        let url = Url::parse("https://esp.example.org/").unwrap();
        transport
            .jar
            .add_cookie_str("csrftoken=abc123; Path=/", &url);
        assert_eq!(
            transport.cookie("https://esp.example.org/manage/", "csrftoken").as_deref(),
            Some("abc123")
        );
        assert_eq!(transport.cookie("https://other.example.org/", "csrftoken"), None);
    }
}
