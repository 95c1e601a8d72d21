//! Connection notices from the platform network status.

use tokio::sync::watch;
use tracing::debug;

/// Notice shown when the network comes back.
pub const CONNECTION_RESTORED: &str = "Connection restored";

/// Notice shown when the network drops.
pub const CONNECTION_LOST: &str = "Connection lost";

/// Turns a network status stream into restored/lost notices.
///
/// The first observed status is reported; after that only changes are.
#[derive(Debug)]
pub struct ConnectionNotifier {
    status: watch::Receiver<bool>,
    last: Option<bool>,
}

impl ConnectionNotifier {
    /// Wraps a network status stream; nothing has been reported yet.
    #[must_use]
    pub fn new(status: watch::Receiver<bool>) -> Self {
        Self { status, last: None }
    }

    /// Notice text for a status.
    #[must_use]
    pub fn notice_for(online: bool) -> &'static str {
        if online {
            CONNECTION_RESTORED
        } else {
            CONNECTION_LOST
        }
    }

    /// Waits for the next distinct status. Returns `None` once the status
    /// source is gone.
    pub async fn next_notice(&mut self) -> Option<&'static str> {
        loop {
            let online = *self.status.borrow_and_update();
            if self.last != Some(online) {
                self.last = Some(online);
                debug!(online, "network status changed");
                return Some(Self::notice_for(online));
            }
            if self.status.changed().await.is_err() {
                return None;
            }
        }
    }
}
