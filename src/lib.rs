//! canopy: a multi-root, filterable file tree browser for the terminal.
//!
//! The library holds the tree model, the exclusion filter, the mutation dialogs and the
//! container that routes gestures between several root directories. The `cnp` binary
//! (`src/main.rs`) is a thin host around [app::CanopyRoot] and the terminal loop.
//!
//! Hosts that embed the container listen for [core::FsEvent]s through
//! [core::EventBus::subscribe] or [core::EventBus::channel].

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
