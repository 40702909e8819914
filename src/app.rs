//! Application layer for canopy.
//!
//! Modules:
//! - [forest]: the multi-root container and its gesture routing.
//! - [panel]: one root's selection and scroll state.
//! - [menu]: context menu construction.
//! - [dialog]: new-item, rename and confirm-delete dialogs.
//! - [handlers]: key and mouse dispatch.
//! - [runtime]: the [CanopyRoot] context driven by the terminal loop.

pub mod dialog;
pub mod forest;
pub mod handlers;
pub mod menu;
pub mod panel;
pub mod runtime;

pub use dialog::{ConfirmDeleteDialog, DialogOutcome, LineInput, Modal, NameDialog, NameStatus};
pub use forest::{Forest, ForestError};
pub use handlers::{ClickTracker, KeypressResult};
pub use menu::{ContextMenu, MenuAction, MenuTarget};
pub use panel::Panel;
pub use runtime::{CanopyRoot, StartupError};
