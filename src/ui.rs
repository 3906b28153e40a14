// UI layer: terminal prompts (via `dialoguer`) and spinners (via
// `indicatif`). The workflows only see the `Confirmation` trait, so tests
// can answer prompts with a closure instead of a terminal.

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

use crate::config::ConnectionArgs;
use crate::session::{Credentials, Session};
use crate::transport::HttpTransport;

/// Asks the operator a yes/no question.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Closures answer directly; handy for scripted runs and tests.
impl<F> Confirmation for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Reads a typed answer from the terminal. Only "yes" (any case) agrees.
pub struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("yes")
}

/// Build the credentials, asking for the password if it was not given.
pub fn credentials(args: &ConnectionArgs) -> Result<Credentials> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new()
            .with_prompt(format!("Password for {}@{}", args.username, args.host))
            .interact()?,
    };
    Ok(Credentials {
        username: args.username.clone(),
        password,
    })
}

/// Log in over the network, showing a spinner meanwhile.
pub fn connect(args: &ConnectionArgs) -> Result<Session<HttpTransport>> {
    let credentials = credentials(args)?;
    let transport = HttpTransport::new()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Logging in to {}...", args.host));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let session = Session::login(transport, args.site(), &credentials, &args.login_options());
    spinner.finish_and_clear();
    let session = session.with_context(|| format!("Login to {} failed", args.host))?;
    info!(host = %args.host, user = %args.username, "logged in");
    Ok(session)
}

/// Progress bar for `len` downloads.
pub fn download_progress(len: u64) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len);
    bar.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);
    Ok(bar)
}
