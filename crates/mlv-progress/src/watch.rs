//! Directory watcher for changes made by other writers.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use notify::{RecursiveMode, Watcher};

use crate::backend::EXTENSION;
use crate::event::{ProgressEvent, ProgressEventReceiver, WatchHandle};
use crate::ProgressError;

/// How often pending changes are flushed as one event.
const TICK: Duration = Duration::from_millis(100);

/// Watch `dir` for changes to persisted progress files.
///
/// Bursts of filesystem events within one tick collapse into a single
/// [`ProgressEventKind::External`](crate::ProgressEventKind::External) event.
/// Temporary files written during atomic replacement are ignored. The
/// directory is created if missing.
pub fn watch_dir(dir: &Path) -> Result<(ProgressEventReceiver, WatchHandle), ProgressError> {
    fs::create_dir_all(dir).map_err(|e| ProgressError::Watch(notify::Error::io(e)))?;

    let (event_tx, event_rx) = mpsc::channel();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
    let pending = Arc::new(AtomicBool::new(false));

    let watcher_pending = Arc::clone(&pending);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        if is_relevant(&event.kind) && event.paths.iter().any(|p| is_progress_file(p)) {
            watcher_pending.store(true, Ordering::Release);
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    let dir = dir.to_path_buf();
    std::thread::spawn(move || {
        let _watcher = watcher;
        tracing::debug!(dir = %dir.display(), "watching progress directory");

        loop {
            match shutdown_rx.recv_timeout(TICK) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
            }
            if pending.swap(false, Ordering::AcqRel)
                && event_tx.send(ProgressEvent::external()).is_err()
            {
                break;
            }
        }
        tracing::debug!(dir = %dir.display(), "stopped watching progress directory");
    });

    Ok((
        ProgressEventReceiver::new(event_rx),
        WatchHandle::new(shutdown_tx),
    ))
}

fn is_relevant(kind: &notify::EventKind) -> bool {
    matches!(
        kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
    )
}

fn is_progress_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}
