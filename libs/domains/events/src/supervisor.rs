//! Background supervision of the external store connection.
//!
//! The supervisor is the only writer of [`ConnectionState`]. It makes the
//! initial attempt, health-checks while connected and retries with
//! exponential backoff while not.

use crate::connection::{ConnectionState, ConnectionStatus};
use crate::error::{EventError, EventResult};
use async_trait::async_trait;
use database::{Backoff, RetryConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Reachability check against the external store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Probe: Send + Sync {
    async fn ping(&self) -> EventResult<()>;

    /// One-off setup run after every successful connect, before the mode
    /// switches to external. Failures are logged, not fatal.
    async fn prepare(&self);
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Upper bound on a single connect attempt or health ping
    pub connect_timeout: Duration,
    /// Delay between health pings while connected
    pub health_interval: Duration,
    /// Reconnect cadence while disconnected
    pub retry: RetryConfig,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            health_interval: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

pub struct ConnectionSupervisor<P: Probe> {
    probe: Arc<P>,
    state: ConnectionState,
    config: SupervisorConfig,
}

impl<P: Probe> ConnectionSupervisor<P> {
    pub fn new(probe: Arc<P>, state: ConnectionState, config: SupervisorConfig) -> Self {
        Self {
            probe,
            state,
            config,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Single connect attempt bounded by `connect_timeout`.
    ///
    /// On failure the state ends in `errored` and the error is returned; the
    /// service keeps answering from the fallback store either way.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> EventResult<()> {
        self.state.begin_connect()?;

        let outcome = match timeout(self.config.connect_timeout, self.probe.ping()).await {
            Ok(result) => result,
            Err(_) => Err(EventError::Timeout(self.config.connect_timeout)),
        };

        match outcome {
            Ok(()) => {
                self.probe.prepare().await;
                self.state.connect_succeeded()?;
                info!("Connected to external store");
                Ok(())
            }
            Err(err) => {
                self.state.connect_failed()?;
                warn!(error = %err, "External store unreachable, serving from fallback");
                Err(err)
            }
        }
    }

    /// Supervise until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut backoff = Backoff::new(self.config.retry.clone());
        let mut wait = match self.state.current_status() {
            ConnectionStatus::Connected => self.config.health_interval,
            _ => backoff.next_delay(),
        };

        info!("Connection supervisor started");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    wait = self.step(&mut backoff).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Connection supervisor stopped");
    }

    /// One supervision tick. Returns how long to wait before the next one.
    async fn step(&self, backoff: &mut Backoff) -> Duration {
        match self.state.current_status() {
            ConnectionStatus::Connected => {
                let healthy = matches!(
                    timeout(self.config.connect_timeout, self.probe.ping()).await,
                    Ok(Ok(()))
                );
                if healthy {
                    debug!("External store health check passed");
                    return self.config.health_interval;
                }

                warn!("External store health check failed, switching to fallback");
                if self.state.connection_lost().is_ok() {
                    backoff.reset();
                }
                backoff.next_delay()
            }
            // Someone else owns the in-flight attempt
            ConnectionStatus::Connecting => self.config.health_interval,
            ConnectionStatus::Disconnected | ConnectionStatus::Errored => {
                match self.connect().await {
                    Ok(()) => {
                        backoff.reset();
                        self.config.health_interval
                    }
                    Err(_) => {
                        let delay = backoff.next_delay();
                        debug!(attempt = backoff.attempts(), ?delay, "Reconnect scheduled");
                        delay
                    }
                }
            }
        }
    }
}
