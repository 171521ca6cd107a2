//! Command implementations for the pingtrail CLI.
//!
//! Each command builds its own session from the saved refresh credential,
//! then enters a view through the navigation guard. When the guard asks
//! for a login, the saved credential is tried before prompting.

pub mod auth;
pub mod pings;
mod render;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use pingtrail_core::client::{ApiClient, HttpTransport};
use pingtrail_core::guard::{guard, Navigation, Route};
use pingtrail_core::{AuthOutcome, SessionManager};
use tracing::debug;

use crate::config::Config;
use crate::credential::CredentialStore;
use crate::error::CliError;

pub type Session = SessionManager<HttpTransport>;

/// Build an anonymous session against the configured API, carrying the
/// refresh credential saved by an earlier run.
pub fn connect(config: &Config) -> Result<Session> {
    let transport = HttpTransport::new(&config.api.url, config.api.timeout_secs)?;
    debug!("Connecting to {}", transport.base_url());

    if let Some(cookies) = CredentialStore::open().load()? {
        transport.restore_cookies(&cookies)?;
    }
    Ok(SessionManager::new(ApiClient::new(transport)))
}

/// Navigate to `target`, signing in if the guard redirects to login.
pub async fn enter(target: Route, session: &Session, config: &Config) -> Result<()> {
    match guard(target, session.is_authenticated()) {
        Navigation::Proceed(_) => Ok(()),
        Navigation::Redirect(Route::Login) => {
            if !resume(session).await? {
                sign_in(session, config, None).await?;
            }
            match guard(target, session.is_authenticated()) {
                Navigation::Proceed(_) => Ok(()),
                _ => Err(CliError::NotAuthenticated(
                    session.error().unwrap_or_else(|| "login required".to_string()),
                )
                .into()),
            }
        }
        Navigation::Redirect(route) => {
            debug!("Guard redirected to {:?}", route);
            Ok(())
        }
    }
}

/// Refresh the session from the saved credential; true when signed in.
///
/// Without a saved credential no request is made.
pub async fn resume(session: &Session) -> Result<bool> {
    if session.client().transport().refresh_cookies().is_none() {
        debug!("No saved session to resume");
        return Ok(false);
    }

    let outcome = with_spinner("Resuming session...", session.refresh_session()).await;
    remember(session, &outcome)?;
    Ok(outcome.is_authenticated())
}

/// Save or drop the refresh credential after a login or refresh.
pub fn remember(session: &Session, outcome: &AuthOutcome) -> Result<()> {
    let cookies = session.client().transport().refresh_cookies();
    CredentialStore::open().record(outcome, cookies)
}

/// Log in with configured or prompted credentials.
pub async fn sign_in(
    session: &Session,
    config: &Config,
    code_name: Option<String>,
) -> Result<AuthOutcome> {
    let (code_name, password) = credentials(config, code_name)?;

    let outcome = with_spinner("Signing in...", session.login(&code_name, &password)).await;
    remember(session, &outcome)?;
    match &outcome {
        AuthOutcome::Authenticated(resp) => {
            println!(
                "{} Signed in as {}",
                "✓".green(),
                resp.user.display_name().cyan()
            );
        }
        AuthOutcome::Anonymous(_) => {
            let message = session.error().unwrap_or_else(|| "Login failed".to_string());
            println!("{} {}", "✗".red(), message);
        }
    }
    Ok(outcome)
}

fn credentials(config: &Config, code_name: Option<String>) -> Result<(String, String), CliError> {
    let code_name = match code_name.or_else(|| config.auth.code_name.clone()) {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Code name")
            .interact_text()?,
    };

    let password = match config.auth.password.clone() {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    if code_name.trim().is_empty() || password.is_empty() {
        return Err(CliError::MissingCredentials(
            "code name and password are required".to_string(),
        ));
    }

    Ok((code_name.trim().to_string(), password))
}

/// Run `fut` behind a terminal spinner.
pub async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}
