// Command-line options shared by both binaries, and the `Site` they
// resolve to.

use clap::{Args, ValueEnum};
use std::fmt;

use crate::session::{LoginOptions, DEFAULT_CSRF_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Https => f.write_str("https"),
            Scheme::Http => f.write_str("http"),
        }
    }
}

/// Where to log in and how. Host, username and password fall back to
/// `ESP_HOST`, `ESP_USERNAME` and `ESP_PASSWORD`; a password that is still
/// missing is asked for on the terminal.
#[derive(Clone, Args)]
pub struct ConnectionArgs {
    /// Site host name, e.g. esp.example.org
    #[arg(short = 'o', long, env = "ESP_HOST")]
    pub host: String,

    #[arg(short = 'u', long, env = "ESP_USERNAME")]
    pub username: String,

    #[arg(short = 'p', long, env = "ESP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Name of the login form; the first form on the page when omitted
    #[arg(short = 'f', long = "loginform-name")]
    pub loginform_name: Option<String>,

    #[arg(long, value_enum, default_value_t = Scheme::Https)]
    pub scheme: Scheme,

    /// Path fetched before login so the server sets its CSRF cookie
    #[arg(long, default_value = DEFAULT_CSRF_PATH)]
    pub csrf_path: String,

    /// Log every request
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("loginform_name", &self.loginform_name)
            .field("scheme", &self.scheme)
            .field("csrf_path", &self.csrf_path)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConnectionArgs {
    pub fn site(&self) -> Site {
        Site::new(self.scheme, &self.host)
    }

    pub fn login_options(&self) -> LoginOptions {
        LoginOptions {
            form_name: self.loginform_name.clone(),
            csrf_path: self.csrf_path.clone(),
        }
    }
}

/// Scheme plus host; builds every URL a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    scheme: Scheme,
    host: String,
}

impl Site {
    pub fn new(scheme: Scheme, host: &str) -> Self {
        Site {
            scheme,
            host: host.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}://{}/{}", self.scheme, self.host, path.trim_start_matches('/'))
    }

    pub fn root(&self) -> String {
        self.url("/")
    }

    /// `/manage/<program>/<endpoint>`
    pub fn program_url(&self, program: &str, endpoint: &str) -> String {
        self.url(&format!("manage/{}/{}", program.trim_matches('/'), endpoint))
    }
}
