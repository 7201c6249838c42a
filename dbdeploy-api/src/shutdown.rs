//! Graceful shutdown handling
//!
//! Translates SIGTERM/SIGINT/SIGQUIT into a watch-channel signal that axum
//! uses to stop accepting connections and drain in-flight requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shutdown coordinator for graceful termination
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
    is_shutting_down: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
            is_shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a receiver for shutdown signals
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Check if shutdown is in progress
    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::SeqCst)
    }

    /// Initiate graceful shutdown
    pub fn shutdown(&self) {
        if self.is_shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for a termination signal from the OS, then trigger shutdown
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            match (
                signal(SignalKind::terminate()),
                signal(SignalKind::interrupt()),
                signal(SignalKind::quit()),
            ) {
                (Ok(mut sigterm), Ok(mut sigint), Ok(mut sigquit)) => {
                    tokio::select! {
                        _ = sigterm.recv() => info!("Received SIGTERM"),
                        _ = sigint.recv() => info!("Received SIGINT"),
                        _ = sigquit.recv() => info!("Received SIGQUIT"),
                    }
                }
                _ => {
                    warn!("Failed to register unix signal handlers, falling back to Ctrl+C");
                    Self::wait_for_ctrl_c().await;
                }
            }
        }

        #[cfg(not(unix))]
        Self::wait_for_ctrl_c().await;

        self.shutdown();
    }

    async fn wait_for_ctrl_c() {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    }

    /// Future that resolves once shutdown has been triggered, for axum
    pub fn signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();

        async move {
            while !*rx.borrow() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
