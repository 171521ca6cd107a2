//! Refresh credential kept between runs.
//!
//! The API hands out its refresh token as a cookie. Each command runs in a
//! fresh process, so the cookie header is written next to the config file
//! after a successful sign-in and fed back into the next transport.

use anyhow::{Context, Result};
use pingtrail_core::AuthOutcome;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store beside the active config file.
    pub fn open() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        Config::config_path().with_file_name("session")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved cookie header, if one exists.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let header = content.trim();
        Ok((!header.is_empty()).then(|| header.to_string()))
    }

    pub fn save(&self, cookies: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(&self.path, cookies).context("Failed to write session file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to restrict session file")?;
        }

        Ok(())
    }

    /// Remove the saved credential. Idempotent.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    /// Follow a login or refresh: keep the newest cookie after a success,
    /// drop a credential the server rejected, and leave it alone when the
    /// server could not be reached.
    pub fn record(&self, outcome: &AuthOutcome, cookies: Option<String>) -> Result<()> {
        match outcome {
            AuthOutcome::Authenticated(_) => match cookies {
                Some(cookies) => {
                    debug!("Saving refresh credential to {}", self.path.display());
                    self.save(&cookies)
                }
                None => Ok(()),
            },
            AuthOutcome::Anonymous(e) if e.is_auth() => {
                debug!("Refresh credential rejected, removing it");
                self.clear()
            }
            AuthOutcome::Anonymous(_) => Ok(()),
        }
    }
}
