//! Tree data source for canopy.
//!
//! A [RootTree] presents one root directory as a tree of [Entry] values, filtered through the
//! shared [ExcludeFilter]. There is no cached snapshot: every query re-reads the live
//! [TreeSource], so answers always reflect the filesystem at query time, though two queries a
//! few milliseconds apart may disagree.
//!
//! Two index spaces exist per directory: the raw index (position in the unfiltered listing
//! returned by the source) and the filtered index (what the view addresses). [FilteredDir]
//! holds the mapping for one directory, [RootTree::rows] flattens the expanded tree into the
//! row space the panels render.

use crate::core::filter::ExcludeFilter;
use crate::core::watch::{self, WatchGuard};

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// A single file or directory as reported by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl Entry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, is_dir }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Directory holding this entry. None for a filesystem root.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The index no longer points at anything, usually because the entry vanished.
    #[error("no entry at index {0}")]
    NotFound(usize),
}

/// Callback invoked by a watch with the path that changed.
pub type ChangeCallback = Box<dyn Fn(&Path) + Send + 'static>;

/// Live source of directory listings.
pub trait TreeSource: Send + Sync {
    /// Lists the direct children of `dir`, in display order.
    fn list_children(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Starts watching `root` recursively. Dropping the guard stops the watch.
    ///
    /// Sources that cannot watch return `Ok(None)`.
    fn watch(&self, _root: &Path, _on_change: ChangeCallback) -> io::Result<Option<WatchGuard>> {
        Ok(None)
    }
}

/// [TreeSource] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl TreeSource for FsSource {
    fn list_children(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for item in fs::read_dir(dir)? {
            let Ok(item) = item else {
                continue;
            };
            // Follow symlinks for the dir flag, fall back to the link itself when broken.
            let path = item.path();
            let is_dir = fs::metadata(&path)
                .map(|m| m.is_dir())
                .or_else(|_| item.file_type().map(|t| t.is_dir()))
                .unwrap_or(false);
            entries.push(Entry::new(path, is_dir));
        }
        entries.sort_by(compare_entries);
        Ok(entries)
    }

    fn watch(&self, root: &Path, on_change: ChangeCallback) -> io::Result<Option<WatchGuard>> {
        watch::watch_recursive(root, on_change).map(Some)
    }
}

/// Directories first, then case-insensitive by name.
fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Position of an entry in the unfiltered listing of its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIndex {
    pub parent: PathBuf,
    pub raw: usize,
}

/// One directory listing with its filtered-to-raw index mapping.
#[derive(Debug, Clone, Default)]
pub struct FilteredDir {
    raw: Vec<Entry>,
    visible: Vec<usize>,
}

impl FilteredDir {
    fn new(raw: Vec<Entry>, filter: &ExcludeFilter) -> Self {
        let visible = raw
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.visible(e.path()))
            .map(|(i, _)| i)
            .collect();
        Self { raw, visible }
    }

    /// Number of visible entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Visible entry at filtered position `idx`.
    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.visible.get(idx).and_then(|&raw| self.raw.get(raw))
    }

    /// Maps a filtered position to its raw position.
    pub fn map_to_source(&self, idx: usize) -> Option<usize> {
        self.visible.get(idx).copied()
    }

    /// Maps a raw position to its filtered position. None if that entry is excluded.
    pub fn map_from_source(&self, raw: usize) -> Option<usize> {
        self.visible.binary_search(&raw).ok()
    }

    pub fn raw_entries(&self) -> &[Entry] {
        &self.raw
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.visible.iter().filter_map(|&i| self.raw.get(i))
    }
}

/// A visible entry flattened into the row space of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub entry: Entry,
    pub depth: usize,
    pub expanded: bool,
    pub source: SourceIndex,
}

/// One root directory presented as a filtered, expandable tree.
pub struct RootTree {
    root: PathBuf,
    source: Arc<dyn TreeSource>,
    filter: Arc<ExcludeFilter>,
    expanded: BTreeSet<PathBuf>,
}

impl RootTree {
    pub fn new(root: PathBuf, source: Arc<dyn TreeSource>, filter: Arc<ExcludeFilter>) -> Self {
        Self {
            root,
            source,
            filter,
            expanded: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn filter(&self) -> &ExcludeFilter {
        &self.filter
    }

    #[inline]
    pub fn source(&self) -> &Arc<dyn TreeSource> {
        &self.source
    }

    /// Filtered listing of `dir`. Unreadable directories read as empty.
    pub fn children(&self, dir: &Path) -> FilteredDir {
        match self.source.list_children(dir) {
            Ok(raw) => FilteredDir::new(raw, &self.filter),
            Err(e) => {
                tracing::debug!("cannot list {}: {}", dir.display(), e);
                FilteredDir::default()
            }
        }
    }

    /// Depth-first flattening of every visible entry under expanded directories.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        self.collect_rows(&self.root, 0, &mut rows);
        rows
    }

    fn collect_rows(&self, dir: &Path, depth: usize, out: &mut Vec<Row>) {
        let listing = self.children(dir);
        for (filtered, entry) in listing.iter().enumerate() {
            let expanded = entry.is_dir() && self.expanded.contains(entry.path());
            let raw = listing.map_to_source(filtered).unwrap_or(filtered);
            out.push(Row {
                entry: entry.clone(),
                depth,
                expanded,
                source: SourceIndex {
                    parent: dir.to_path_buf(),
                    raw,
                },
            });
            if expanded {
                self.collect_rows(entry.path(), depth + 1, out);
            }
        }
    }

    /// Entry at a filtered row. Fails with [TreeError::NotFound] when the row is stale.
    pub fn resolve(&self, row: usize) -> Result<Entry, TreeError> {
        self.rows()
            .into_iter()
            .nth(row)
            .map(|r| r.entry)
            .ok_or(TreeError::NotFound(row))
    }

    /// Raw position behind a filtered row.
    pub fn map_to_source(&self, row: usize) -> Result<SourceIndex, TreeError> {
        self.rows()
            .into_iter()
            .nth(row)
            .map(|r| r.source)
            .ok_or(TreeError::NotFound(row))
    }

    /// Filtered row of a raw position, if it is currently shown.
    pub fn map_from_source(&self, idx: &SourceIndex) -> Option<usize> {
        self.rows().iter().position(|r| r.source == *idx)
    }

    /// Row currently showing `path`, if any.
    pub fn row_of(&self, path: &Path) -> Option<usize> {
        self.rows().iter().position(|r| r.entry.path() == path)
    }

    /// True if `path` lies under the root and neither it nor any ancestor below the root is
    /// excluded. The root itself is always visible.
    pub fn is_visible(&self, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return false;
        };
        let mut current = self.root.clone();
        for comp in rel.components() {
            current.push(comp);
            if !self.filter.visible(&current) {
                return false;
            }
        }
        true
    }

    // Expansion state

    pub fn is_expanded(&self, dir: &Path) -> bool {
        self.expanded.contains(dir)
    }

    pub fn expand(&mut self, dir: &Path) {
        self.expanded.insert(dir.to_path_buf());
    }

    pub fn collapse(&mut self, dir: &Path) {
        self.expanded.remove(dir);
        // Drop expanded descendants too, so re-expanding starts folded.
        self.expanded.retain(|p| !p.starts_with(dir));
    }

    /// Flips the expansion state of a directory. Returns the new state.
    pub fn toggle(&mut self, dir: &Path) -> bool {
        if self.is_expanded(dir) {
            self.collapse(dir);
            false
        } else {
            self.expand(dir);
            true
        }
    }

    /// Forgets expansion state for directories that no longer exist.
    pub fn prune_expanded(&mut self) {
        self.expanded.retain(|p| p.is_dir());
    }
}
