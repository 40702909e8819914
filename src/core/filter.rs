//! Exclusion filter for canopy.
//!
//! Decides whether a path is visible given a list of glob exclusion patterns.
//! Patterns are matched against the full path with flat glob semantics: `*` happily crosses
//! path separators, so `*/cache` hides `/proj/cache` and also `/a/b/cache`.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Compiled exclusion pattern set, shared read-only between all roots.
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExcludeFilter {
    /// Compiles the given patterns. Order is kept for display only, matching is any-of.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterError> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let pat = pat.as_ref();
            let glob = GlobBuilder::new(pat)
                .literal_separator(false)
                .backslash_escape(false)
                .case_insensitive(cfg!(windows))
                .build()
                .map_err(|e| FilterError::InvalidPattern {
                    pattern: pat.to_string(),
                    message: e.to_string(),
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| FilterError::InvalidPattern {
            pattern: patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set,
        })
    }

    /// A filter with no patterns. Everything is visible.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    #[inline]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns false iff at least one pattern matches the whole path.
    #[inline]
    pub fn visible(&self, path: &Path) -> bool {
        self.set.is_empty() || !self.set.is_match(path)
    }
}

impl Default for ExcludeFilter {
    fn default() -> Self {
        Self::empty()
    }
}

/// Free-function form of [ExcludeFilter::visible] for one-off checks.
pub fn visible<S: AsRef<str>>(path: &Path, patterns: &[S]) -> Result<bool, FilterError> {
    Ok(ExcludeFilter::new(patterns)?.visible(path))
}
