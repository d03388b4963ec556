//! Single-value observable state cell backed by a tokio watch channel

use tokio::sync::watch;

/// Holds a current value and notifies every subscriber on each `set`,
/// including sets that store an equal value.
#[derive(Debug)]
pub struct ObservableState<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> ObservableState<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replace the current value and notify subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Modify the current value in place and notify subscribers
    pub fn update<F>(&self, modify: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(modify);
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Subscribe to changes. The receiver starts with the current value
    /// marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cell = ObservableState::new(1);
        assert_eq!(cell.get(), 1);
        cell.set(2);
        assert_eq!(cell.get(), 2);
        cell.update(|v| *v += 3);
        assert_eq!(cell.get(), 5);
    }

    #[tokio::test]
    async fn test_subscriber_sees_every_set() {
        let cell: ObservableState<Option<String>> = ObservableState::new(None);
        let mut rx = cell.subscribe();
        assert!(!rx.has_changed().unwrap());

        cell.set(Some("424905".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("424905"));

        // equal values still notify
        cell.set(Some("424905".to_string()));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_late_subscriber_reads_current_value() {
        let cell = ObservableState::new(vec![1, 2]);
        cell.set(vec![3]);
        let rx = cell.subscribe();
        assert_eq!(*rx.borrow(), vec![3]);
    }
}
