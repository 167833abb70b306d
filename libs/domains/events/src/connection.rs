//! Connection state machine for the external store.
//!
//! ```text
//! disconnected ──begin_connect──► connecting ──connect_succeeded──► connected
//!       ▲                             │                                 │
//!       │                       connect_failed                   connection_lost
//!       │                             ▼                                 │
//!       └──────────── errored ◄───────┴─────────────────────────────────┘
//!                        │
//!                        └──begin_connect──► connecting
//! ```
//!
//! The storage mode is derived from the status: `external` exactly while
//! connected, `fallback` otherwise. There is no terminal state.

use serde::Serialize;
use std::sync::Arc;
use strum::{Display, EnumString};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

/// Which backend serves requests
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, ToSchema,
)]
pub enum StorageMode {
    /// In-process volatile store
    #[serde(rename = "demo")]
    #[strum(serialize = "demo")]
    Fallback,
    /// External document store
    #[serde(rename = "live")]
    #[strum(serialize = "live")]
    External,
}

impl StorageMode {
    pub fn is_fallback(&self) -> bool {
        matches!(self, StorageMode::Fallback)
    }
}

impl From<ConnectionStatus> for StorageMode {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Connected => StorageMode::External,
            _ => StorageMode::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {event} while {from}")]
pub struct TransitionError {
    pub from: ConnectionStatus,
    pub event: &'static str,
}

/// Shared, injectable holder of the connection status.
///
/// Cloning shares the same underlying state. Reads are lock-free snapshots;
/// writes happen only through the named transitions below.
#[derive(Clone, Debug)]
pub struct ConnectionState {
    tx: Arc<watch::Sender<ConnectionStatus>>,
}

impl ConnectionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionStatus::Disconnected);
        Self { tx: Arc::new(tx) }
    }

    pub fn current_status(&self) -> ConnectionStatus {
        *self.tx.borrow()
    }

    pub fn current_mode(&self) -> StorageMode {
        self.current_status().into()
    }

    /// Receiver that observes every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.tx.subscribe()
    }

    /// `disconnected | errored → connecting`
    pub fn begin_connect(&self) -> Result<(), TransitionError> {
        self.transition("begin_connect", ConnectionStatus::Connecting, |from| {
            matches!(
                from,
                ConnectionStatus::Disconnected | ConnectionStatus::Errored
            )
        })
    }

    /// `connecting → connected`; mode becomes external
    pub fn connect_succeeded(&self) -> Result<(), TransitionError> {
        self.transition("connect_succeeded", ConnectionStatus::Connected, |from| {
            from == ConnectionStatus::Connecting
        })
    }

    /// `connecting → errored`; mode stays fallback
    pub fn connect_failed(&self) -> Result<(), TransitionError> {
        self.transition("connect_failed", ConnectionStatus::Errored, |from| {
            from == ConnectionStatus::Connecting
        })
    }

    /// `connected → errored`; mode drops back to fallback
    pub fn connection_lost(&self) -> Result<(), TransitionError> {
        self.transition("connection_lost", ConnectionStatus::Errored, |from| {
            from == ConnectionStatus::Connected
        })
    }

    fn transition(
        &self,
        event: &'static str,
        to: ConnectionStatus,
        allowed: impl Fn(ConnectionStatus) -> bool,
    ) -> Result<(), TransitionError> {
        let mut outcome = Ok(ConnectionStatus::Disconnected);
        self.tx.send_if_modified(|status| {
            if allowed(*status) {
                outcome = Ok(*status);
                *status = to;
                true
            } else {
                outcome = Err(TransitionError {
                    from: *status,
                    event,
                });
                false
            }
        });

        match outcome {
            Ok(from) => {
                let mode = StorageMode::from(to);
                debug!(%from, %to, %mode, "Connection state changed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Rejected connection state transition");
                Err(err)
            }
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}
