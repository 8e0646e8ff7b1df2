//! Lifecycle management.
//!
//! Shutdown signalling and OS signal handling.

use tokio::sync::watch;
use tracing::info;

pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    /// Receiver that flips to `true` on shutdown
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn shutdown(&self) {
        info!("shutdown requested");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for SIGINT/SIGTERM (Ctrl+C elsewhere), then signal shutdown
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            tokio::select! {
                _ = sigint.recv() => info!("SIGINT received"),
                _ = sigterm.recv() => info!("SIGTERM received"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            info!("Ctrl+C received");
        }

        self.shutdown();
        Ok(())
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let lm = LifecycleManager::new();
        assert!(!*lm.subscribe().borrow());
    }

    #[tokio::test]
    async fn shutdown_reaches_subscribers() {
        let lm = LifecycleManager::new();
        let mut rx = lm.subscribe();
        lm.shutdown();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
