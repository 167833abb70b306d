use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Fans a single shutdown trigger out to every background task.
///
/// Subscribers receive a `watch::Receiver<bool>` that flips to `true` once
/// shutdown starts. Late subscribers observe the current value immediately.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    tx: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.tx.borrow()
    }

    /// Initiate shutdown. Idempotent.
    pub fn shutdown(&self) {
        let started = self.tx.send_if_modified(|flag| {
            let changed = !*flag;
            *flag = true;
            changed
        });
        if started {
            info!("Initiating graceful shutdown");
        }
    }

    /// Resolve once shutdown has been initiated by anyone.
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        // Sender lives in self, so wait_for cannot observe a closed channel.
        let _ = rx.wait_for(|flag| *flag).await;
    }

    /// Wait for SIGINT/SIGTERM, then initiate shutdown.
    pub async fn wait_for_signal(&self) {
        tokio::select! {
            _ = shutdown_signal() => self.shutdown(),
            _ = self.wait() => {}
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
