//! Miscellaneous utility functions for canopy.
//!
//! - [cli]: command-line parsing, help and `--init`.
//! - [helpers]: home directory handling, root validation, the editor launcher and logging setup.

pub mod cli;
pub mod helpers;

pub use helpers::{
    expand_home_path, get_home, init_logging, open_in_editor, resolve_root, shorten_home_path,
};
