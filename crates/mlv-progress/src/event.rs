//! Change notification for progress state.
//!
//! Events carry no delta: observers re-read the store when one arrives.

use std::sync::mpsc;

/// Name under which change notifications are published to clients.
pub const PROGRESS_EVENT: &str = "mlv:progress-changed";

/// Where a change originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressEventKind {
    /// A mutation made through this process's store.
    Changed,
    /// The progress directory was modified by another writer.
    External,
}

/// A progress change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub kind: ProgressEventKind,
}

impl ProgressEvent {
    #[must_use]
    pub const fn changed() -> Self {
        Self {
            kind: ProgressEventKind::Changed,
        }
    }

    #[must_use]
    pub const fn external() -> Self {
        Self {
            kind: ProgressEventKind::External,
        }
    }
}

/// Receiver for progress events.
///
/// Wraps a [`std::sync::mpsc::Receiver`]; poll with [`recv()`](Self::recv) or
/// [`try_recv()`](Self::try_recv), or iterate with [`iter()`](Self::iter).
pub struct ProgressEventReceiver {
    rx: mpsc::Receiver<ProgressEvent>,
}

impl ProgressEventReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<ProgressEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event (blocking).
    ///
    /// Returns `None` once every sender is dropped.
    #[must_use]
    pub fn recv(&self) -> Option<ProgressEvent> {
        self.rx.recv().ok()
    }

    /// Try to receive an event without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<ProgressEvent> {
        self.rx.try_recv().ok()
    }

    /// Blocking iterator that ends when every sender is dropped.
    pub fn iter(&self) -> impl Iterator<Item = ProgressEvent> + '_ {
        self.rx.iter()
    }
}

/// Handle to stop a directory watcher.
///
/// Dropping the handle stops watching.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    pub(crate) fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching immediately.
    pub fn stop(mut self) {
        self._shutdown.take();
    }
}
