//! Domain events emitted towards the host application.
//!
//! Listeners are called synchronously, in registration order, on the thread that completed the
//! operation. Events are fire-and-forget: no return values, no acknowledgment.

use crossbeam_channel::{Receiver, unbounded};
use std::fmt;
use std::path::PathBuf;

/// Everything canopy announces to the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    OpenFile(PathBuf),
    FileCreated(PathBuf),
    FileRenamed { from: PathBuf, to: PathBuf },
    FileRemoved(PathBuf),
    DirCreated(PathBuf),
    DirRenamed { from: PathBuf, to: PathBuf },
    DirRemoved(PathBuf),
}

impl FsEvent {
    /// The path the event is mostly about (the new path for renames).
    pub fn path(&self) -> &PathBuf {
        match self {
            FsEvent::OpenFile(p)
            | FsEvent::FileCreated(p)
            | FsEvent::FileRemoved(p)
            | FsEvent::DirCreated(p)
            | FsEvent::DirRemoved(p) => p,
            FsEvent::FileRenamed { to, .. } | FsEvent::DirRenamed { to, .. } => to,
        }
    }

    #[inline]
    pub fn is_removal(&self) -> bool {
        matches!(self, FsEvent::FileRemoved(_) | FsEvent::DirRemoved(_))
    }
}

impl fmt::Display for FsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsEvent::OpenFile(p) => write!(f, "open {}", p.display()),
            FsEvent::FileCreated(p) => write!(f, "created file {}", p.display()),
            FsEvent::FileRenamed { from, to } => {
                write!(f, "renamed file {} -> {}", from.display(), to.display())
            }
            FsEvent::FileRemoved(p) => write!(f, "trashed file {}", p.display()),
            FsEvent::DirCreated(p) => write!(f, "created dir {}", p.display()),
            FsEvent::DirRenamed { from, to } => {
                write!(f, "renamed dir {} -> {}", from.display(), to.display())
            }
            FsEvent::DirRemoved(p) => write!(f, "trashed dir {}", p.display()),
        }
    }
}

type Listener = Box<dyn FnMut(&FsEvent)>;

/// Listener registry. Owned by the container, emits on the caller's thread.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Listeners cannot be removed.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&FsEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Registers a listener that forwards every event into a channel.
    ///
    /// Useful when the host consumes events somewhere other than inside a callback.
    pub fn channel(&mut self) -> Receiver<FsEvent> {
        let (tx, rx) = unbounded();
        self.subscribe(move |ev| {
            let _ = tx.send(ev.clone());
        });
        rx
    }

    pub fn emit(&mut self, event: FsEvent) {
        tracing::info!("{}", event);
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
