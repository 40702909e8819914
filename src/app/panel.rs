//! A single root's panel: the tree plus selection and scroll state.
//!
//! Rows are addressed by their index in [RootTree::rows]. The panel keeps only indices and
//! re-resolves them on demand, so a stale index simply resolves to nothing.

use crate::core::{Entry, RootTree, Row};

use ratatui::layout::Rect;
use std::path::Path;

/// Rows at the top of a panel used by its title.
pub const HEADER_ROWS: u16 = 1;

pub struct Panel {
    tree: RootTree,
    selected: usize,
    scroll: usize,
    area: Rect,
}

impl Panel {
    pub fn new(tree: RootTree) -> Self {
        Self {
            tree,
            selected: 0,
            scroll: 0,
            area: Rect::default(),
        }
    }

    #[inline]
    pub fn tree(&self) -> &RootTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut RootTree {
        &mut self.tree
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        self.tree.root_path()
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.ensure_visible();
    }

    /// Number of tree rows that fit below the header.
    pub fn body_height(&self) -> usize {
        self.area.height.saturating_sub(HEADER_ROWS) as usize
    }

    pub fn rows(&self) -> Vec<Row> {
        self.tree.rows()
    }

    pub fn selected_entry(&self) -> Option<Entry> {
        self.tree.resolve(self.selected).ok()
    }

    /// Row index under a panel-local y coordinate. The header and the empty space below the
    /// last row are background.
    pub fn row_at(&self, local_y: u16) -> Option<usize> {
        if local_y < HEADER_ROWS {
            return None;
        }
        let idx = self.scroll + (local_y - HEADER_ROWS) as usize;
        (idx < self.tree.rows().len()).then_some(idx)
    }

    pub fn select(&mut self, row: usize) {
        self.selected = row;
        self.ensure_visible();
    }

    pub fn select_path(&mut self, path: &Path) {
        if let Some(row) = self.tree.row_of(path) {
            self.select(row);
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    pub fn move_down(&mut self) {
        let len = self.tree.rows().len();
        if self.selected + 1 < len {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    /// Scrolls by `delta` rows without moving the selection.
    pub fn scroll_by(&mut self, delta: isize) {
        let len = self.tree.rows().len();
        let max = len.saturating_sub(self.body_height().max(1));
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Clamps selection and scroll after the row count changed.
    pub fn clamp(&mut self) {
        let len = self.tree.rows().len();
        if len == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        if self.selected >= len {
            self.selected = len - 1;
        }
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let height = self.body_height();
        if height == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }
    }
}
