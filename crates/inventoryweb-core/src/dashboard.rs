//! Dashboard state store
//!
//! The store owns a single [`DashboardState`] behind a `tokio::sync::watch`
//! channel. Every transition is one atomic modification of that channel, and
//! any number of observers can [`Dashboard::subscribe`] to it.
//!
//! Each activation takes a ticket. Only the completion carrying the latest
//! ticket is applied; older completions are dropped, so overlapping
//! activations always settle on the response of the last one started.

use crate::error::CoreResult;
use crate::models::InventoryPayload;
use crate::source::SourceRef;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What the dashboard view renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub result: Option<InventoryPayload>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Ticket of the most recent activation, 0 before the first one
    #[serde(skip)]
    pub activation: u64,
}

pub struct Dashboard {
    source: SourceRef,
    state: watch::Sender<DashboardState>,
}

impl Dashboard {
    pub fn new(source: SourceRef) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self { source, state }
    }

    /// Current state
    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied transition
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn endpoint(&self) -> &str {
        self.source.endpoint()
    }

    /// Enter the loading state and return the new activation's ticket
    pub fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            state.activation += 1;
            ticket = state.activation;
            state.result = None;
            state.error_message = None;
            state.is_loading = true;
        });
        log::info!("Activation {} started, querying {}", ticket, self.source.endpoint());
        ticket
    }

    /// Apply the outcome of activation `ticket`. Returns false if a newer
    /// activation has started since, in which case nothing changes.
    pub fn complete(&self, ticket: u64, outcome: CoreResult<InventoryPayload>) -> bool {
        match &outcome {
            Ok(payload) => log::info!(
                "Activation {} finished with {} account(s)",
                ticket,
                payload.len()
            ),
            Err(e) => log::warn!(
                "Activation {} failed [{}] ({}): {}",
                ticket,
                e.code(),
                e.severity(),
                e
            ),
        }

        let applied = self.state.send_if_modified(|state| {
            if state.activation != ticket {
                return false;
            }
            state.is_loading = false;
            match outcome {
                Ok(payload) => {
                    state.result = Some(payload);
                    state.error_message = None;
                }
                Err(e) => {
                    state.result = None;
                    state.error_message = Some(e.to_string());
                }
            }
            true
        });

        if !applied {
            log::debug!("Discarded stale completion of activation {}", ticket);
        }
        applied
    }

    /// Leave the loading state without a result, used when an activation is
    /// dropped before its request resolves
    fn abandon(&self, ticket: u64) {
        let cleared = self.state.send_if_modified(|state| {
            if state.activation != ticket || !state.is_loading {
                return false;
            }
            state.is_loading = false;
            true
        });
        if cleared {
            log::warn!("Activation {} was cancelled before completing", ticket);
        }
    }

    async fn run(&self, ticket: u64) {
        let mut guard = LoadingGuard {
            dashboard: self,
            ticket,
            armed: true,
        };
        let outcome = self.source.fetch().await;
        guard.armed = false;
        self.complete(ticket, outcome);
    }

    /// Run one activation to completion and return the resulting state
    pub async fn activate(&self) -> DashboardState {
        let ticket = self.begin();
        self.run(ticket).await;
        self.snapshot()
    }

    /// Enter the loading state now and finish the request in the background
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let ticket = self.begin();
        let dashboard = Arc::clone(self);
        tokio::spawn(async move {
            dashboard.run(ticket).await;
        })
    }
}

struct LoadingGuard<'a> {
    dashboard: &'a Dashboard,
    ticket: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.dashboard.abandon(self.ticket);
        }
    }
}
