//! Client-side session lifecycle.
//!
//! ## State Machine
//!
//! ```text
//! Anonymous
//!   │
//!   ├─► login / refresh succeeds ──► Authenticated { user, access_token }
//!   │
//!   └─► login / refresh fails ─────► Anonymous (error recorded)
//!
//! Authenticated
//!   │
//!   ├─► logout ────────────────────► Anonymous
//!   │
//!   ├─► login / refresh fails ─────► Anonymous (error recorded)
//!   │
//!   └─► ping action gets 401/403 ──► Anonymous
//! ```
//!
//! Every outbound ping request goes through [`SessionManager::client`] with
//! the token from [`SessionManager::authorization`], so the header is
//! present exactly while the session is authenticated.

mod manager;

pub use manager::*;
