//! Capability flags for canopy.
//!
//! Decides which mutating actions the context menu offers and whether removals ask for
//! confirmation first. Read once at construction and never changed afterwards.

use serde::Deserialize;

/// Which create/rename/remove actions are offered, per entry kind.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    pub can_create_file: bool,
    pub can_rename_file: bool,
    pub can_remove_file: bool,
    pub can_create_dir: bool,
    pub can_rename_dir: bool,
    pub can_remove_dir: bool,
    pub confirm_removal: bool,
}

/// Everything on except directory removal, removals confirmed.
impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            can_create_file: true,
            can_rename_file: true,
            can_remove_file: true,
            can_create_dir: true,
            can_rename_dir: true,
            can_remove_dir: false,
            confirm_removal: true,
        }
    }
}

impl Capabilities {
    /// All actions allowed, removals still confirmed.
    pub fn all() -> Self {
        Capabilities {
            can_remove_dir: true,
            ..Self::default()
        }
    }

    /// Nothing that mutates the filesystem. Browsing, opening and copying paths remain.
    pub fn read_only() -> Self {
        Capabilities {
            can_create_file: false,
            can_rename_file: false,
            can_remove_file: false,
            can_create_dir: false,
            can_rename_dir: false,
            can_remove_dir: false,
            confirm_removal: true,
        }
    }
}
