//! Replay-latest fan-out of a root store's values.

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::Model;

/// Holds the last folded value and one channel per subscriber.
///
/// A new subscriber receives the current value first, then every published
/// change, in the same order as every other subscriber.
pub(crate) struct Hub<T> {
    state: RwLock<HubState<T>>,
}

struct HubState<T> {
    current: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

impl<T: Model> Hub<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(HubState {
                current: initial,
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    pub(crate) fn current(&self) -> T {
        self.state.read().current.clone()
    }

    /// Returns `None` once the hub is closed.
    pub(crate) fn subscribe(&self) -> Option<mpsc::UnboundedReceiver<T>> {
        let mut state = self.state.write();
        if state.closed {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        // Cannot fail: the receiver is still in hand.
        let _ = tx.send(state.current.clone());
        state.subscribers.push(tx);
        Some(rx)
    }

    /// Store `value` and broadcast it, unless it equals the current value.
    ///
    /// Returns whether the value changed.
    pub(crate) fn publish(&self, value: T) -> bool {
        let mut state = self.state.write();
        if state.current == value {
            return false;
        }
        state.subscribers.retain(|tx| {
            let delivered = tx.send(value.clone()).is_ok();
            if !delivered {
                tracing::trace!("Dropping closed subscriber");
            }
            delivered
        });
        state.current = value;
        true
    }

    /// Ends every subscriber stream and refuses new subscriptions.
    pub(crate) fn close(&self) {
        let mut state = self.state.write();
        state.closed = true;
        state.subscribers.clear();
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.state.read().subscribers.len()
    }
}
