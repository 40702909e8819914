//! The general configuration settings for canopy.
//!
//! [General] is deserialized straight from canopy.toml. Root strings are kept as written
//! (home expansion and canonicalization happen when the container is built), exclusion
//! patterns are kept verbatim and compiled later.

use crate::utils::expand_home_path;

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    roots: Vec<String>,
    exclude: Vec<String>,
    icons: bool,
    panel_ratios: Vec<u16>,
}

impl Default for General {
    fn default() -> Self {
        General {
            roots: Vec::new(),
            exclude: vec![
                "*/.git".to_string(),
                "*/target".to_string(),
                "*/__pycache__".to_string(),
            ],
            icons: false,
            panel_ratios: Vec::new(),
        }
    }
}

impl General {
    /// Configured roots with `~` expanded. Empty when none were configured.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.iter().map(|r| expand_home_path(r)).collect()
    }

    #[inline]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    #[inline]
    pub fn icons(&self) -> bool {
        self.icons
    }

    #[inline]
    pub fn panel_ratios(&self) -> &[u16] {
        &self.panel_ratios
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<String>) {
        self.roots = roots;
    }

    pub(crate) fn extend_exclude(&mut self, patterns: Vec<String>) {
        self.exclude.extend(patterns);
    }
}

/// Editor used by the demo host for open-file requests.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Editor {
    cmd: String,
}

impl Editor {
    #[inline]
    pub fn cmd(&self) -> &str {
        let trimmed = self.cmd.trim();
        if trimmed.is_empty() { "vim" } else { trimmed }
    }

    pub fn exists(&self) -> bool {
        which::which(self.cmd()).is_ok()
    }
}

impl Default for Editor {
    fn default() -> Self {
        let cmd = std::env::var("EDITOR").unwrap_or_else(|_| "nvim".into());
        Editor { cmd }
    }
}
