//! Advisory online/offline tracking. Gates the network clients at their call
//! sites and drives the persistent offline indicator; performs no retry or
//! reconnection logic itself.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    online: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Starts tracking from the platform's current connectivity signal.
    pub fn new(initially_online: bool) -> Self {
        let (online, _) = watch::channel(initially_online);
        Self {
            online: Arc::new(online),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    /// Feeds a platform "became online" / "became offline" event in.
    pub fn set_online(&self, online: bool) {
        let previous = self.online.send_replace(online);
        if previous != online {
            info!(online, "connectivity changed");
        }
    }

    /// Observe connectivity changes, e.g. for the offline banner.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_initial_state() {
        assert!(ConnectivityMonitor::new(true).is_online());
        assert!(!ConnectivityMonitor::new(false).is_online());
    }

    #[test]
    fn transitions_are_visible_to_all_handles() {
        let monitor = ConnectivityMonitor::new(true);
        let clone = monitor.clone();

        monitor.set_online(false);
        assert!(!clone.is_online());

        clone.set_online(true);
        assert!(monitor.is_online());
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        monitor.set_online(false);
        rx.changed().await.expect("changed");
        assert!(!*rx.borrow());
    }
}
