//! Ping store: the fetched ping lists, the activation set and the actions
//! that refresh them.
//!
//! Every action sets `processing` before its request and clears it after,
//! records a human-readable `error` on failure and clears it on success.
//! Requests carry the session's bearer token when there is one; an auth
//! failure ends the session.

use tracing::{debug, warn};

use crate::chain::{self, ActivationSet, Chain};
use crate::client::Transport;
use crate::error::Result;
use crate::processing::Processing;
use crate::session::SessionManager;
use crate::types::{Coordinates, Ping, PingId};

/// State behind the ping views.
#[derive(Debug, Default)]
pub struct PingStore {
    pings: Vec<Ping>,
    latest_pings: Vec<Ping>,
    processing: Processing,
    error: Option<String>,
    active_ping: Option<Ping>,
    activation: ActivationSet,
}

impl PingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the ping list with every ping visible to the session.
    pub async fn fetch_all_pings<T: Transport>(&mut self, session: &SessionManager<T>) -> Result<()> {
        let result = {
            let _processing = self.processing.begin();
            session
                .client()
                .fetch_all_pings(session.authorization().as_deref())
                .await
        };

        let page = self.settle(session, result, "Failed to fetch pings")?;
        debug!("Fetched {} pings", page.results.len());
        self.pings = page.results;
        Ok(())
    }

    /// Replace the latest-pings list.
    pub async fn fetch_latest_pings<T: Transport>(
        &mut self,
        session: &SessionManager<T>,
    ) -> Result<()> {
        let result = {
            let _processing = self.processing.begin();
            session
                .client()
                .fetch_latest_pings(session.authorization().as_deref())
                .await
        };

        self.latest_pings = self.settle(session, result, "Failed to fetch latest pings")?;
        Ok(())
    }

    /// Broadcast a new ping, optionally as a reply to `parent`.
    ///
    /// The ping list is not updated; call [`fetch_all_pings`](Self::fetch_all_pings).
    pub async fn create_ping<T: Transport>(
        &mut self,
        session: &SessionManager<T>,
        coords: Coordinates,
        parent: Option<PingId>,
    ) -> Result<Ping> {
        let result = {
            let _processing = self.processing.begin();
            session
                .client()
                .create_ping(coords, parent, session.authorization().as_deref())
                .await
        };

        self.settle(session, result, "Failed to create ping")
    }

    /// Reply to `parent_id`, then refetch the list and make the reply active.
    pub async fn respond_to_ping<T: Transport>(
        &mut self,
        session: &SessionManager<T>,
        parent_id: PingId,
        coords: Coordinates,
    ) -> Result<Ping> {
        let result = {
            let _processing = self.processing.begin();
            session
                .client()
                .respond_to_ping(parent_id, coords, session.authorization().as_deref())
                .await
        };

        let ping = self.settle(session, result, "Failed to respond to ping")?;

        // A failed refetch is recorded on `error`; the reply itself went through.
        if self.fetch_all_pings(session).await.is_ok() {
            self.set_active_ping(Some(ping.id));
        }
        Ok(ping)
    }

    /// Make the ping with `id` active, if it is in the current list.
    pub fn set_active_ping(&mut self, id: Option<PingId>) {
        self.active_ping = id.and_then(|id| self.pings.iter().find(|p| p.id == id).cloned());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn activate_chain(&mut self, ping_id: PingId) {
        self.activation.activate(ping_id);
    }

    pub fn deactivate_chain(&mut self, ping_id: PingId) {
        self.activation.deactivate(ping_id);
    }

    pub fn toggle_chain(&mut self, ping_id: PingId) {
        self.activation.toggle(ping_id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    pub fn latest_pings(&self) -> &[Ping] {
        &self.latest_pings
    }

    pub fn processing(&self) -> bool {
        self.processing.is_set()
    }

    /// A handle on the `processing` flag that can be read while an action
    /// holds the store.
    pub fn processing_handle(&self) -> Processing {
        self.processing.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_ping(&self) -> Option<&Ping> {
        self.active_ping.as_ref()
    }

    pub fn activation(&self) -> &ActivationSet {
        &self.activation
    }

    /// Chains over the current ping list.
    pub fn chains(&self) -> Vec<Chain> {
        chain::chains(&self.pings)
    }

    pub fn active_chains(&self) -> Vec<Chain> {
        chain::active_chains(&self.chains(), &self.activation)
    }

    pub fn is_in_active_chain(&self, ping_id: PingId) -> bool {
        chain::is_in_active_chain(&self.chains(), &self.activation, ping_id)
    }

    pub fn chain_for(&self, ping_id: PingId) -> Chain {
        chain::chain_for(&self.chains(), ping_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn settle<T: Transport, R>(
        &mut self,
        session: &SessionManager<T>,
        result: Result<R>,
        fallback: &str,
    ) -> Result<R> {
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(e) => {
                warn!("{}: {}", fallback, e);
                if e.is_auth() {
                    session.unset_user();
                }
                self.error = Some(e.user_message(fallback));
                Err(e)
            }
        }
    }
}
