//! Authentication commands.

use anyhow::Result;
use colored::Colorize;
use pingtrail_core::guard::Route;
use tracing::info;

use super::{connect, enter, remember, sign_in, with_spinner};
use crate::config::Config;
use crate::credential::CredentialStore;
use crate::error::CliError;

/// Sign in and print the session
pub async fn login(code_name: Option<String>, save_code_name: bool, config: &Config) -> Result<()> {
    let session = connect(config)?;

    let outcome = sign_in(&session, config, code_name).await?;
    if !outcome.is_authenticated() {
        return Err(CliError::NotAuthenticated(
            session.error().unwrap_or_else(|| "Login failed".to_string()),
        )
        .into());
    }

    // Signed in now, so the guard sends the login view on to the dashboard.
    enter(Route::Login, &session, config).await?;

    if save_code_name {
        if let Some(user) = session.current_user() {
            let path = Config::config_path();
            Config::remember_code_name(&path, &user.code_name)?;
            info!("Saved code name to {}", path.display());
        }
    }

    print_session(&session);
    Ok(())
}

/// Show auth status
pub async fn status(config: &Config) -> Result<()> {
    let session = connect(config)?;

    println!("{}", "Authentication Status".bold());
    println!("{}", "─".repeat(40));
    println!("API:       {}", config.api.url.cyan());

    let outcome = with_spinner("Refreshing session...", session.refresh_session()).await;
    remember(&session, &outcome)?;
    print_session(&session);

    if let Some(error) = session.error() {
        println!("Detail:    {}", error.yellow());
    }

    Ok(())
}

/// Forget the saved session
pub async fn logout(config: &Config) -> Result<()> {
    let session = connect(config)?;
    session.logout();

    let credentials = CredentialStore::open();
    credentials.clear()?;
    info!("Removed {}", credentials.path().display());

    println!("{} Signed out", "✓".green());
    print_session(&session);
    Ok(())
}

fn print_session(session: &super::Session) {
    match session.current_user() {
        Some(user) => {
            println!("Session:   {}", "Authenticated".green());
            println!("User:      {} (id {})", user.display_name().cyan(), user.id);
            if let Some(email) = user.email {
                println!("Email:     {}", email);
            }
        }
        None => println!("Session:   {}", "Anonymous".red()),
    }
}
