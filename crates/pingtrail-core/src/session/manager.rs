//! Session manager: identity, bearer token and the transitions between
//! the anonymous and authenticated states.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::client::{ApiClient, Transport};
use crate::error::Error;
use crate::processing::{Processing, ProcessingGuard};
use crate::types::{TokenResponse, User};

/// Current identity. The user and token only exist together.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { user: User, access_token: String },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { access_token, .. } => Some(access_token),
            Session::Anonymous => None,
        }
    }
}

/// Result of a login or refresh.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Session established; carries the server response for display.
    Authenticated(TokenResponse),
    /// Session cleared; carries the reason.
    Anonymous(Error),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            AuthOutcome::Anonymous(e) => Some(e),
            AuthOutcome::Authenticated(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    error: Option<String>,
}

/// Owns the session and the API client every request goes through.
///
/// Methods take `&self`; overlapping transitions are allowed and the last
/// response to arrive wins.
pub struct SessionManager<T: Transport> {
    client: ApiClient<T>,
    state: RwLock<SessionState>,
    processing: Processing,
}

impl<T: Transport> SessionManager<T> {
    /// Create an anonymous session over `client`.
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            state: RwLock::new(SessionState::default()),
            processing: Processing::new(),
        }
    }

    /// The API client, for requests that should be authorized by this session.
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Try to resume a session from the transport's stored credential.
    ///
    /// Never fails: on any error the session ends up anonymous.
    pub async fn refresh_session(&self) -> AuthOutcome {
        let _processing = self.begin();
        let result = self.client.refresh().await;
        self.settle("refresh", result, "Session refresh failed")
    }

    /// Authenticate with a code name and password.
    pub async fn login(&self, code_name: &str, password: &str) -> AuthOutcome {
        let _processing = self.begin();
        let result = self.client.login(code_name, password).await;
        self.settle("login", result, "Login failed")
    }

    /// Clear the session. Idempotent.
    pub fn unset_user(&self) {
        let mut state = self.write();
        if state.session.is_authenticated() {
            info!("Session cleared");
        }
        state.session = Session::Anonymous;
    }

    /// Explicit logout; same effect as [`unset_user`](Self::unset_user).
    pub fn logout(&self) {
        self.unset_user();
        self.write().error = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().session.user().cloned()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().session.access_token().map(String::from)
    }

    /// Snapshot of the whole session.
    pub fn session(&self) -> Session {
        self.read().session.clone()
    }

    /// Bearer token for outbound requests; `None` while anonymous.
    pub fn authorization(&self) -> Option<String> {
        self.access_token()
    }

    /// Advisory flag for the UI; set while any transition is in flight.
    pub fn processing(&self) -> bool {
        self.processing.is_set()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn settle(
        &self,
        op: &str,
        result: crate::Result<TokenResponse>,
        fallback: &str,
    ) -> AuthOutcome {
        let mut state = self.write();
        match result {
            Ok(resp) => {
                info!("{} succeeded for {}", op, resp.user.display_name());
                state.session = Session::Authenticated {
                    user: resp.user.clone(),
                    access_token: resp.access.clone(),
                };
                state.error = None;
                AuthOutcome::Authenticated(resp)
            }
            Err(e) => {
                warn!("{} failed: {}", op, e);
                state.session = Session::Anonymous;
                state.error = Some(e.user_message(fallback));
                AuthOutcome::Anonymous(e)
            }
        }
    }

    fn begin(&self) -> ProcessingGuard {
        debug!("Session transition started");
        self.processing.begin()
    }

    // A poisoned lock still holds a consistent enum, so keep using it.
    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
