//! The multi-root container.
//!
//! A [Forest] owns one [Panel] per root, stacked top to bottom in construction order. It turns
//! gestures into outcomes: activating a file emits [FsEvent::OpenFile], a context request opens
//! a [ContextMenu], and menu actions open dialogs, run mutations or copy paths.
//!
//! Only one popup is open at a time: a context menu or a modal. Opening a modal closes the
//! menu, and while a modal is open it receives all input.

use crate::app::dialog::{ConfirmDeleteDialog, DialogOutcome, Modal, NameDialog};
use crate::app::menu::{ContextMenu, MenuAction, MenuTarget};
use crate::app::panel::{HEADER_ROWS, Panel};
use crate::config::Capabilities;
use crate::core::clipboard::{ClipboardSink, SystemClipboard};
use crate::core::events::{EventBus, FsEvent};
use crate::core::mutate::{FileOps, Mutation, Mutator};
use crate::core::paths::{relative_path, split_parent};
use crate::core::{Entry, ExcludeFilter, FsSource, RootTree, TreeSource};
use crate::ui::icons::{IconProvider, NoIcons};

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForestError {
    #[error("at least one root directory is required")]
    NoRoots,
}

pub struct Forest {
    panels: Vec<Panel>,
    filter: Arc<ExcludeFilter>,
    capabilities: Capabilities,
    focus: usize,
    menu: Option<ContextMenu>,
    modal: Option<Modal>,
    events: EventBus,
    mutator: Mutator,
    clipboard: Box<dyn ClipboardSink>,
    icons: Arc<dyn IconProvider>,
    panel_ratios: Vec<u16>,
    area: Rect,
}

impl Forest {
    /// Container over live directories.
    pub fn new(
        roots: Vec<PathBuf>,
        filter: ExcludeFilter,
        capabilities: Capabilities,
    ) -> Result<Self, ForestError> {
        Self::with_source(roots, Arc::new(FsSource), filter, capabilities)
    }

    /// Container reading its listings from `source`.
    pub fn with_source(
        roots: Vec<PathBuf>,
        source: Arc<dyn TreeSource>,
        filter: ExcludeFilter,
        capabilities: Capabilities,
    ) -> Result<Self, ForestError> {
        if roots.is_empty() {
            return Err(ForestError::NoRoots);
        }
        let filter = Arc::new(filter);
        let panels = roots
            .into_iter()
            .map(|root| Panel::new(RootTree::new(root, Arc::clone(&source), Arc::clone(&filter))))
            .collect();

        Ok(Self {
            panels,
            filter,
            capabilities,
            focus: 0,
            menu: None,
            modal: None,
            events: EventBus::new(),
            mutator: Mutator::default(),
            clipboard: Box::new(SystemClipboard::new()),
            icons: Arc::new(NoIcons),
            panel_ratios: Vec::new(),
            area: Rect::default(),
        })
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_file_ops(mut self, ops: Box<dyn FileOps>) -> Self {
        self.mutator = Mutator::new(ops);
        self
    }

    // Getters / accessors

    #[inline]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    #[inline]
    pub fn panel(&self, idx: usize) -> Option<&Panel> {
        self.panels.get(idx)
    }

    #[inline]
    pub fn panel_mut(&mut self, idx: usize) -> Option<&mut Panel> {
        self.panels.get_mut(idx)
    }

    #[inline]
    pub fn roots(&self) -> Vec<&Path> {
        self.panels.iter().map(|p| p.root_path()).collect()
    }

    #[inline]
    pub fn filter(&self) -> &ExcludeFilter {
        &self.filter
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    #[inline]
    pub fn icons(&self) -> &dyn IconProvider {
        self.icons.as_ref()
    }

    #[inline]
    pub fn panel_ratios(&self) -> &[u16] {
        &self.panel_ratios
    }

    #[inline]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[inline]
    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    #[inline]
    pub fn menu_mut(&mut self) -> Option<&mut ContextMenu> {
        self.menu.as_mut()
    }

    #[inline]
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    #[inline]
    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    // Display setup

    /// Installs the icon provider used by every panel.
    pub fn set_icon_provider(&mut self, icons: Arc<dyn IconProvider>) {
        self.icons = icons;
    }

    /// Relative panel heights, in root order. Missing entries count as 1.
    pub fn set_panel_ratios(&mut self, ratios: Vec<u16>) {
        self.panel_ratios = ratios;
    }

    /// Records the container area and the area of each panel, as laid out by the renderer.
    pub fn set_layout(&mut self, area: Rect, panel_areas: &[Rect]) {
        self.area = area;
        for (panel, rect) in self.panels.iter_mut().zip(panel_areas) {
            panel.set_area(*rect);
        }
    }

    // Focus and selection

    #[inline]
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, idx: usize) {
        if idx < self.panels.len() {
            self.focus = idx;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.panels.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.panels.len() - 1) % self.panels.len();
    }

    pub fn focused_panel_mut(&mut self) -> &mut Panel {
        &mut self.panels[self.focus]
    }

    /// Panel whose band contains screen row `y`, with the row translated to panel-local
    /// coordinates. Bands are the cumulative panel heights from the container top.
    pub fn panel_at(&self, y: u16) -> Option<(usize, u16)> {
        let rel = y.checked_sub(self.area.y)?;
        let mut offset = 0u16;
        for (idx, panel) in self.panels.iter().enumerate() {
            let height = panel.area().height;
            if rel >= offset && rel < offset.saturating_add(height) {
                return Some((idx, rel - offset));
            }
            offset = offset.saturating_add(height);
        }
        None
    }

    fn contains_point(&self, x: u16, y: u16) -> bool {
        x >= self.area.x && x < self.area.right() && y >= self.area.y && y < self.area.bottom()
    }

    // Activation

    /// Activates `row` of `panel`. A file emits [FsEvent::OpenFile] exactly once, a directory
    /// toggles its expansion and emits nothing.
    pub fn activate(&mut self, panel: usize, row: usize) -> Option<FsEvent> {
        let p = self.panels.get_mut(panel)?;
        let entry = p.tree().resolve(row).ok()?;
        p.select(row);
        self.focus = panel;

        if entry.is_dir() {
            let p = &mut self.panels[panel];
            p.tree_mut().toggle(entry.path());
            p.clamp();
            return None;
        }
        self.emit_open(&entry)
    }

    pub fn activate_selected(&mut self) -> Option<FsEvent> {
        let row = self.panels[self.focus].selected();
        self.activate(self.focus, row)
    }

    fn emit_open(&mut self, entry: &Entry) -> Option<FsEvent> {
        let event = FsEvent::OpenFile(entry.path().to_path_buf());
        self.events.emit(event.clone());
        Some(event)
    }

    // Context menu

    /// Opens the context menu for whatever lies under screen position `(x, y)`.
    /// Returns false when the position is outside every panel.
    pub fn context_request(&mut self, x: u16, y: u16) -> bool {
        if !self.contains_point(x, y) {
            return false;
        }
        let Some((idx, local_y)) = self.panel_at(y) else {
            return false;
        };
        let panel = &mut self.panels[idx];
        let row = panel.row_at(local_y);
        let entry = row.and_then(|r| panel.tree().resolve(r).ok());
        if let Some(r) = row {
            panel.select(r);
        }
        self.focus = idx;
        self.open_menu(idx, MenuTarget::from_entry(entry), (x, y));
        true
    }

    /// Opens the context menu for the selected row of the focused panel.
    pub fn context_request_selected(&mut self) {
        let panel = &self.panels[self.focus];
        let entry = panel.selected_entry();
        let area = panel.area();
        let visible_row = panel.selected().saturating_sub(panel.scroll()) as u16;
        let anchor = (
            area.x.saturating_add(2),
            area.y
                .saturating_add(HEADER_ROWS)
                .saturating_add(visible_row),
        );
        self.open_menu(self.focus, MenuTarget::from_entry(entry), anchor);
    }

    fn open_menu(&mut self, panel: usize, target: MenuTarget, anchor: (u16, u16)) {
        tracing::debug!("context menu on panel {} for {:?}", panel, target);
        self.menu = Some(ContextMenu::new(panel, target, &self.capabilities, anchor));
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Runs the selected menu item.
    pub fn invoke_selected(&mut self) -> Option<FsEvent> {
        let action = self.menu.as_ref()?.selected_action()?;
        self.invoke(action)
    }

    /// Runs `action` from the open menu and closes it. Actions the menu does not offer are
    /// ignored.
    pub fn invoke(&mut self, action: MenuAction) -> Option<FsEvent> {
        let menu = self.menu.take()?;
        if !menu.contains(action) {
            return None;
        }
        let idx = menu.panel();
        let root = self.panels.get(idx)?.root_path().to_path_buf();
        let target = menu.target().clone();

        match (action, &target) {
            (MenuAction::Open, MenuTarget::File(entry)) => self.emit_open(entry),
            (MenuAction::NewFile | MenuAction::NewDir, _) => {
                let parent = target
                    .entry()
                    .map(|e| e.path().to_path_buf())
                    .unwrap_or_else(|| root.clone());
                let is_file = action == MenuAction::NewFile;
                self.open_modal(Modal::Name(NameDialog::new_item(
                    idx, &root, &parent, is_file,
                )));
                None
            }
            (MenuAction::RenameFile | MenuAction::RenameDir, _) => {
                let entry = target.entry()?;
                let (parent, name) = split_parent(entry.path())?;
                self.open_modal(Modal::Name(NameDialog::rename_item(
                    idx,
                    &root,
                    &parent,
                    &name,
                    entry.is_file(),
                )));
                None
            }
            (MenuAction::RemoveFile | MenuAction::RemoveDir, _) => {
                let entry = target.entry()?;
                if self.capabilities.confirm_removal {
                    self.open_modal(Modal::ConfirmDelete(ConfirmDeleteDialog::new(
                        idx,
                        &root,
                        entry.path(),
                        entry.is_file(),
                    )));
                    None
                } else {
                    let mutation = if entry.is_file() {
                        Mutation::RemoveFile {
                            path: entry.path().to_path_buf(),
                        }
                    } else {
                        Mutation::RemoveDir {
                            path: entry.path().to_path_buf(),
                        }
                    };
                    self.run_mutation(idx, &mutation, None)
                }
            }
            (MenuAction::CopyRelativePath, _) => {
                let entry = target.entry()?;
                self.copy(relative_path(&root, entry.path()));
                None
            }
            (MenuAction::CopyFullPath, _) => {
                let entry = target.entry()?;
                self.copy(entry.path().display().to_string());
                None
            }
            (MenuAction::CopyRootPath, _) => {
                self.copy(root.display().to_string());
                None
            }
            _ => None,
        }
    }

    fn copy(&mut self, text: String) {
        if let Err(e) = self.clipboard.set_text(text) {
            tracing::warn!("{}", e);
        }
    }

    // Modals

    pub fn open_modal(&mut self, modal: Modal) {
        self.menu = None;
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Feeds a key to the open modal.
    pub fn modal_key(&mut self, key: KeyEvent) -> Option<FsEvent> {
        let outcome = self.modal.as_mut()?.handle_key(key);
        self.finish_modal(outcome)
    }

    /// Feeds a mouse press to the open modal.
    pub fn modal_click(&mut self, x: u16, y: u16) -> Option<FsEvent> {
        let outcome = self.modal.as_mut()?.handle_click(x, y);
        self.finish_modal(outcome)
    }

    fn finish_modal(&mut self, outcome: DialogOutcome) -> Option<FsEvent> {
        let name = match outcome {
            DialogOutcome::Pending => return None,
            DialogOutcome::Cancelled => {
                self.modal = None;
                return None;
            }
            DialogOutcome::Submitted(name) => Some(name),
            DialogOutcome::Confirmed => None,
        };
        let pending = self.modal.take()?.pending().clone();
        self.run_mutation(pending.root, &pending.mutation, name.as_deref())
    }

    fn run_mutation(
        &mut self,
        root: usize,
        mutation: &Mutation,
        name: Option<&str>,
    ) -> Option<FsEvent> {
        let event = self.mutator.apply(mutation, name, &mut self.events);
        self.refresh();
        if let Some(ev) = &event
            && !ev.is_removal()
        {
            self.reveal(root, ev.path());
        }
        event
    }

    /// Expands the ancestors of `path` and selects it.
    fn reveal(&mut self, root: usize, path: &Path) {
        let Some(panel) = self.panels.get_mut(root) else {
            return;
        };
        let root_path = panel.root_path().to_path_buf();
        let mut ancestors: Vec<&Path> = path
            .ancestors()
            .skip(1)
            .take_while(|a| a.starts_with(&root_path) && *a != root_path)
            .collect();
        ancestors.reverse();
        for dir in ancestors {
            panel.tree_mut().expand(dir);
        }
        panel.select_path(path);
    }

    /// Re-clamps every panel after the filesystem changed underneath.
    pub fn refresh(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.tree_mut().prune_expanded();
            panel.clamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clipboard::MemoryClipboard;

    use crossterm::event::{KeyCode, KeyModifiers};
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Two roots, 10 rows each, stacked from y = 2.
    fn two_roots() -> Result<(tempfile::TempDir, Forest), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for root in ["app", "lib"] {
            let r = dir.path().join(root);
            fs::create_dir_all(r.join("src"))?;
            fs::write(r.join("README.md"), "")?;
        }
        let mut forest = Forest::new(
            vec![dir.path().join("app"), dir.path().join("lib")],
            ExcludeFilter::empty(),
            Capabilities::default(),
        )?;
        forest.set_layout(
            Rect::new(0, 2, 40, 20),
            &[Rect::new(0, 2, 40, 10), Rect::new(0, 12, 40, 10)],
        );
        Ok((dir, forest))
    }

    #[test]
    fn test_requires_a_root() {
        let result = Forest::new(Vec::new(), ExcludeFilter::empty(), Capabilities::default());
        assert!(matches!(result, Err(ForestError::NoRoots)));
    }

    #[test]
    fn test_bands_route_to_panels() -> Result<(), Box<dyn error::Error>> {
        let (_dir, forest) = two_roots()?;
        assert_eq!(forest.panel_at(1), None);
        assert_eq!(forest.panel_at(2), Some((0, 0)));
        assert_eq!(forest.panel_at(11), Some((0, 9)));
        assert_eq!(forest.panel_at(12), Some((1, 0)));
        assert_eq!(forest.panel_at(21), Some((1, 9)));
        assert_eq!(forest.panel_at(22), None);
        Ok(())
    }

    #[test]
    fn test_context_request_targets() -> Result<(), Box<dyn error::Error>> {
        let (dir, mut forest) = two_roots()?;

        // header row of the second panel
        assert!(forest.context_request(5, 12));
        assert_eq!(forest.menu().map(|m| m.target()), Some(&MenuTarget::Background));

        // first row of the second panel: "src" (directories sort first)
        assert!(forest.context_request(5, 13));
        let menu = forest.menu().ok_or("menu")?;
        assert_eq!(menu.panel(), 1);
        assert_eq!(
            menu.target(),
            &MenuTarget::Dir(Entry::new(dir.path().join("lib/src"), true))
        );
        assert_eq!(forest.focus(), 1);

        // outside the container
        forest.close_menu();
        assert!(!forest.context_request(50, 5));
        assert!(forest.menu().is_none());
        Ok(())
    }

    #[test]
    fn test_activation_events() -> Result<(), Box<dyn error::Error>> {
        let (dir, mut forest) = two_roots()?;
        let rx = forest.events_mut().channel();

        // row 1 is README.md, row 0 is src
        let ev = forest.activate(0, 1);
        assert_eq!(ev, Some(FsEvent::OpenFile(dir.path().join("app/README.md"))));
        assert_eq!(forest.activate(0, 0), None);
        assert!(forest.panels()[0].tree().is_expanded(&dir.path().join("app/src")));
        assert_eq!(forest.activate(0, 99), None);

        assert_eq!(rx.try_iter().count(), 1);
        Ok(())
    }

    #[test]
    fn test_new_file_through_menu_and_dialog() -> Result<(), Box<dyn error::Error>> {
        let (dir, mut forest) = two_roots()?;
        let rx = forest.events_mut().channel();

        assert!(forest.context_request(5, 3));
        assert_eq!(forest.invoke(MenuAction::NewFile), None);
        assert!(forest.menu().is_none());
        assert!(forest.modal().is_some());

        for c in "main.rs".chars() {
            assert_eq!(forest.modal_key(key(KeyCode::Char(c))), None);
        }
        let created = dir.path().join("app/src/main.rs");
        assert_eq!(
            forest.modal_key(key(KeyCode::Enter)),
            Some(FsEvent::FileCreated(created.clone()))
        );
        assert!(forest.modal().is_none());
        assert!(created.is_file());

        let panel = &forest.panels()[0];
        assert!(panel.tree().is_expanded(&dir.path().join("app/src")));
        assert_eq!(panel.selected_entry().map(|e| e.path().to_path_buf()), Some(created));
        assert_eq!(rx.try_iter().count(), 1);
        Ok(())
    }

    #[test]
    fn test_copy_actions_use_owning_root() -> Result<(), Box<dyn error::Error>> {
        let (dir, forest) = two_roots()?;
        let clipboard = MemoryClipboard::new();
        let mut forest = forest.with_clipboard(Box::new(clipboard.clone()));

        assert!(forest.context_request(5, 14));
        forest.invoke(MenuAction::CopyRelativePath);
        assert_eq!(clipboard.text().as_deref(), Some("README.md"));

        assert!(forest.context_request(5, 14));
        forest.invoke(MenuAction::CopyFullPath);
        assert_eq!(
            clipboard.text(),
            Some(dir.path().join("lib/README.md").display().to_string())
        );

        assert!(forest.context_request(5, 20));
        forest.invoke(MenuAction::CopyRootPath);
        assert_eq!(
            clipboard.text(),
            Some(dir.path().join("lib").display().to_string())
        );
        Ok(())
    }

    #[test]
    fn test_gated_action_is_ignored() -> Result<(), Box<dyn error::Error>> {
        let (_dir, mut forest) = two_roots()?;
        assert!(forest.context_request(5, 3));
        assert_eq!(forest.invoke(MenuAction::RemoveDir), None);
        assert!(forest.modal().is_none());
        Ok(())
    }

    #[test]
    fn test_cancelled_removal_keeps_the_file() -> Result<(), Box<dyn error::Error>> {
        let (dir, mut forest) = two_roots()?;
        let rx = forest.events_mut().channel();

        assert!(forest.context_request(5, 4));
        forest.invoke(MenuAction::RemoveFile);
        assert!(matches!(forest.modal(), Some(Modal::ConfirmDelete(_))));
        assert_eq!(forest.modal_key(key(KeyCode::Char('n'))), None);
        assert!(forest.modal().is_none());
        assert!(dir.path().join("app/README.md").exists());
        assert_eq!(rx.try_iter().count(), 0);
        Ok(())
    }
}
