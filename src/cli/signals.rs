//! Ctrl+C handling for recording

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Flag raised by Ctrl+C so a recording can stop early and still be saved
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Start listening for Ctrl+C
    pub fn setup(&self) {
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_signal_default_is_false() {
        assert!(!ShutdownSignal::new().is_shutdown());
    }

    #[test]
    fn shutdown_signal_flag_can_be_set() {
        let signal = ShutdownSignal::new();
        signal.flag().store(true, Ordering::SeqCst);
        assert!(signal.is_shutdown());
    }
}
