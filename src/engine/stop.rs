use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative stop request for a recording loop
///
/// Cheap to clone; any task may call `stop`. The loop only looks at the flag
/// between iterations, so an in-flight read always completes.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub(crate) fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Clear a stale request before a new recording begins
    pub(crate) fn reset(&self) {
        self.tx.send_replace(false);
    }
}
