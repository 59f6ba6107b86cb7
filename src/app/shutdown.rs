//! Ctrl-C handling and the stop signal awaited by the session loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the process-wide stop flag.
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    signal: watch::Sender<bool>,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            signal,
        }
    }

    /// Flags shutdown and wakes every subscriber.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.signal.send_replace(true);
        tracing::info!("Stop requested, finishing session");
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Receiver that flips to `true` once shutdown is requested.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// Spawns a task that requests shutdown on Ctrl-C.
    pub fn listen_for_ctrl_c(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                manager.request_shutdown();
            }
        });
    }
}
