//! Observable state cells shared between the controller and its views.

use tokio::sync::watch;

/// A value with change notification. Writers never block on readers and
/// updates are kept even when nobody is subscribed.
#[derive(Debug)]
pub struct Signal<T> {
    tx: watch::Sender<T>,
}

impl<T> Signal<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.tx.send_modify(modify);
    }

    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Raises a busy flag for as long as it is alive. Dropping it lowers the
/// flag, which also happens while unwinding from a panic.
#[must_use = "the busy flag is lowered as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    flag: &'a Signal<bool>,
}

impl<'a> BusyGuard<'a> {
    pub fn raise(flag: &'a Signal<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
