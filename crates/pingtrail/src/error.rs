//! Error types for the pingtrail CLI.

use thiserror::Error;

/// Errors the CLI reports itself, on top of core errors.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Not signed in: {0}")]
    NotAuthenticated(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}
