//! pingtrail-core - Core library for pingtrail
//!
//! This crate provides the client-side logic shared by every pingtrail
//! front end:
//!
//! - **session**: Authentication state machine and bearer-token injection
//! - **chain**: Reply-chain reconstruction from a flat ping list
//! - **store**: Ping list, activation set and store actions
//! - **client**: Typed API calls over a pluggable transport
//! - **guard**: Navigation guard for protected views
//! - **processing**: Shared in-flight flag for the session and store
//! - **types**: Wire types for every endpoint

pub mod chain;
pub mod client;
pub mod error;
pub mod guard;
pub mod processing;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chain::{ActivationSet, Chain};
pub use client::{ApiClient, Transport};
pub use error::{Error, ErrorKind, Result};
pub use processing::Processing;
pub use session::{AuthOutcome, Session, SessionManager};
pub use store::PingStore;
pub use types::{Coordinates, Ping, PingId, User};
