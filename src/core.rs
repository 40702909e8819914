//! Core logic for canopy.
//!
//! This module contains the non-UI pieces the container is built on:
//! - [paths]: filesystem primitives (create, rename, move to trash) and path helpers.
//! - [filter]: the exclusion predicate over full paths.
//! - [tree]: the tree data source and the per-root filtered view.
//! - [watch]: notify-backed change notices.
//! - [events]: domain events and the listener registry.
//! - [clipboard]: clipboard sinks for the copy actions.
//! - [mutate]: turning confirmed dialogs into filesystem calls and events.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.
//!
//! Most callers will import [RootTree], [Entry] and [ExcludeFilter] from this module.

pub mod clipboard;
pub mod events;
pub mod filter;
pub mod mutate;
pub mod paths;
pub mod terminal;
pub mod tree;
pub mod watch;

pub use clipboard::{ClipboardError, ClipboardSink, MemoryClipboard, SystemClipboard};
pub use events::{EventBus, FsEvent};
pub use filter::{ExcludeFilter, FilterError};
pub use mutate::{FileOps, Mutation, Mutator, OsFileOps, PendingOperation};
pub use paths::{FsOpError, FsOpResult};
pub use tree::{Entry, FilteredDir, FsSource, RootTree, Row, SourceIndex, TreeError, TreeSource};
pub use watch::{RootChanged, WatchGuard};
