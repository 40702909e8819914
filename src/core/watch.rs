//! Filesystem watching for canopy.
//!
//! Each root is watched recursively through notify with a short debounce. The watch does not
//! feed any cache (trees re-read the filesystem on every query); it only tells the event loop
//! that something under a root changed so the panels get redrawn.

use crate::core::tree::ChangeCallback;

use crossbeam_channel::{Receiver, Sender, unbounded};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::io;
use std::path::Path;
use std::time::Duration;

/// Debounce window for coalescing bursts of filesystem events.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Keeps a watch alive. Dropping it stops the underlying watcher.
pub struct WatchGuard {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard").finish_non_exhaustive()
    }
}

/// Starts a recursive, debounced watch on `root`, calling `on_change` for each changed path.
pub fn watch_recursive(root: &Path, on_change: ChangeCallback) -> io::Result<WatchGuard> {
    let mut debouncer = new_debouncer(WATCH_DEBOUNCE, move |res: DebounceEventResult| match res {
        Ok(events) => {
            for event in events {
                on_change(&event.path);
            }
        }
        Err(e) => tracing::warn!("watch error: {}", e),
    })
    .map_err(io::Error::other)?;

    debouncer
        .watcher()
        .watch(root, RecursiveMode::Recursive)
        .map_err(io::Error::other)?;

    tracing::debug!("watching {}", root.display());
    Ok(WatchGuard {
        _debouncer: debouncer,
    })
}

/// Notice sent to the event loop when something below a root changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootChanged {
    pub root: usize,
}

/// Channel pair the runtime uses to collect change notices from every root's watch.
pub fn change_channel() -> (Sender<RootChanged>, Receiver<RootChanged>) {
    unbounded()
}

/// Builds the callback for root `root` that forwards notices into `tx`.
pub fn forward_to(tx: Sender<RootChanged>, root: usize) -> ChangeCallback {
    Box::new(move |_path| {
        let _ = tx.send(RootChanged { root });
    })
}
