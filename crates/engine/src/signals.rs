//! Change notifications between views.
//!
//! A single [`ChangeFeed`] is created by the host and handed by reference
//! to every view. Views emit a [`ChangeSignal`] after a successful mutation
//! and hold their own [`Subscription`] to learn that another view changed
//! the data they show.

use tokio::sync::broadcast::{self, error::TryRecvError};

const FEED_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeSignal {
    ActiveChanged,
    HistoryChanged,
}

#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeSignal>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn emit(&self, signal: ChangeSignal) {
        tracing::debug!("emit {signal:?}");
        // No subscribers is not an error.
        let _ = self.sender.send(signal);
    }
}

#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeSignal>,
}

impl Subscription {
    /// Drains every pending signal and reports whether `wanted` was among
    /// them. A lagged receiver has lost signals and reports `true`.
    pub fn take(&mut self, wanted: ChangeSignal) -> bool {
        let mut seen = false;
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => seen |= signal == wanted,
                Err(TryRecvError::Lagged(_)) => seen = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return seen,
            }
        }
    }
}
