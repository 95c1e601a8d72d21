//! # Reactive Snapshots
//!
//! [`Observable`] is a multicast, replay-latest value built on
//! [`tokio::sync::watch`]. A subscriber attaching at any time reads the most
//! recent snapshot immediately; dropping the [`Subscription`] ends it.
//!
//! Subscribers only ever receive owned clones. No borrow of the channel
//! escapes this module, so a subscriber may call back into the owning store
//! while it reacts to a snapshot.

use tokio::sync::watch;

/// Owner side of a replay-latest stream.
///
/// Only the owning store holds an `Observable`; everyone else gets a
/// [`Subscription`] through [`Observable::subscribe`].
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    /// Creates the stream with its first snapshot.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Clone of the current snapshot.
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Runs `f` against the current snapshot without cloning it.
    ///
    /// `f` must not publish to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// New subscription positioned at the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Replaces the snapshot and notifies every subscriber.
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Subscriber side of an [`Observable`].
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Clone of the latest snapshot. Does not mark it as seen.
    #[must_use]
    pub fn get(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Clone of the latest snapshot, marking it as seen.
    pub fn get_and_update(&mut self) -> T {
        self.receiver.borrow_and_update().clone()
    }

    /// `true` if a snapshot was published since the last one seen. A closed
    /// stream never reports a change.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next published snapshot and returns it. Returns `None`
    /// once the owning store is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.get_and_update())
    }
}
