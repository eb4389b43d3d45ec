//! One-shot readiness gate for the event system.
//!
//! The gate opens once every hook has been attached. Code that emits events
//! whose side effects must be observed (creating a user, whose personal
//! organization is provisioned by a hook) waits on the gate first.

use tokio::sync::watch;

/// A latch that opens exactly once and never closes again.
///
/// Clones share the same state.
#[derive(Clone, Debug)]
pub struct ReadinessGate {
    sender: watch::Sender<bool>,
}

impl ReadinessGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Open the gate, releasing every current and future waiter.
    ///
    /// Opening an already open gate is a no-op.
    pub fn mark_ready(&self) {
        self.sender.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
    }

    /// Returns `true` once the gate has been opened.
    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until the gate is open. Returns immediately if it already is.
    pub async fn wait_ready(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn starts_closed() {
        let gate = ReadinessGate::new();
        assert!(!gate.is_ready());
    }

    #[test]
    fn waiter_is_released_when_opened() {
        let gate = ReadinessGate::new();
        let mut waiter = task::spawn(gate.wait_ready());

        assert_pending!(waiter.poll());

        gate.mark_ready();
        assert!(waiter.is_woken());
        assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn open_gate_does_not_block() {
        let gate = ReadinessGate::new();
        gate.mark_ready();
        gate.mark_ready();
        gate.wait_ready().await;
        assert!(gate.is_ready());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let gate = ReadinessGate::new();
        let other = gate.clone();

        let handle = tokio::spawn(async move { other.wait_ready().await });
        gate.mark_ready();
        handle.await.unwrap();
    }
}
