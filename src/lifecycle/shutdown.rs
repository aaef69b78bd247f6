//! Shutdown coordination for the server.

use std::future::Future;

use tokio::sync::broadcast;

/// Fan-out of the "stop serving" signal.
///
/// The HTTP server and any background task hold a [`broadcast::Receiver`];
/// [`Shutdown::trigger`] wakes all of them at once.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        match self.tx.send(()) {
            Ok(listeners) => {
                tracing::info!(listeners, "Shutdown triggered");
                listeners
            }
            Err(_) => {
                tracing::debug!("Shutdown triggered with nothing listening");
                0
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Future resolving once `rx` sees the signal (or its sender is gone),
/// suitable for `with_graceful_shutdown`.
pub fn signalled(mut rx: broadcast::Receiver<()>) -> impl Future<Output = ()> + Send {
    async move {
        let _ = rx.recv().await;
    }
}
