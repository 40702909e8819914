//! Context menu construction for canopy.
//!
//! The menu offered depends on what was under the pointer (a file, a directory, or empty
//! background) and on the [Capabilities]. Each mutating action is gated by its own flag, so
//! turning one off never affects another.

use crate::config::Capabilities;
use crate::core::Entry;

use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    RenameFile,
    RemoveFile,
    NewFile,
    NewDir,
    RenameDir,
    RemoveDir,
    CopyRelativePath,
    CopyFullPath,
    CopyRootPath,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Open => "Open",
            MenuAction::RenameFile => "Rename file",
            MenuAction::RemoveFile => "Remove file",
            MenuAction::NewFile => "New file",
            MenuAction::NewDir => "New subdir",
            MenuAction::RenameDir => "Rename dir",
            MenuAction::RemoveDir => "Remove dir",
            MenuAction::CopyRelativePath => "Copy relative path",
            MenuAction::CopyFullPath => "Copy full path",
            MenuAction::CopyRootPath => "Copy root path",
        }
    }
}

/// What the menu was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    File(Entry),
    Dir(Entry),
    Background,
}

impl MenuTarget {
    pub fn from_entry(entry: Option<Entry>) -> Self {
        match entry {
            Some(e) if e.is_dir() => MenuTarget::Dir(e),
            Some(e) => MenuTarget::File(e),
            None => MenuTarget::Background,
        }
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            MenuTarget::File(e) | MenuTarget::Dir(e) => Some(e),
            MenuTarget::Background => None,
        }
    }
}

/// Actions offered for `target`, in display order.
pub fn actions_for(target: &MenuTarget, caps: &Capabilities) -> Vec<MenuAction> {
    let mut items = Vec::with_capacity(6);
    match target {
        MenuTarget::File(_) => {
            items.push(MenuAction::Open);
            if caps.can_rename_file {
                items.push(MenuAction::RenameFile);
            }
            if caps.can_remove_file {
                items.push(MenuAction::RemoveFile);
            }
            items.push(MenuAction::CopyRelativePath);
            items.push(MenuAction::CopyFullPath);
        }
        MenuTarget::Dir(_) => {
            if caps.can_create_file {
                items.push(MenuAction::NewFile);
            }
            if caps.can_create_dir {
                items.push(MenuAction::NewDir);
            }
            if caps.can_rename_dir {
                items.push(MenuAction::RenameDir);
            }
            if caps.can_remove_dir {
                items.push(MenuAction::RemoveDir);
            }
            items.push(MenuAction::CopyRelativePath);
            items.push(MenuAction::CopyFullPath);
        }
        MenuTarget::Background => {
            if caps.can_create_file {
                items.push(MenuAction::NewFile);
            }
            if caps.can_create_dir {
                items.push(MenuAction::NewDir);
            }
            items.push(MenuAction::CopyRootPath);
        }
    }
    items
}

/// An open context menu: target, items, selection and where it was drawn.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    panel: usize,
    target: MenuTarget,
    items: Vec<MenuAction>,
    selected: usize,
    anchor: (u16, u16),
    area: Option<Rect>,
}

impl ContextMenu {
    pub fn new(panel: usize, target: MenuTarget, caps: &Capabilities, anchor: (u16, u16)) -> Self {
        let items = actions_for(&target, caps);
        Self {
            panel,
            target,
            items,
            selected: 0,
            anchor,
            area: None,
        }
    }

    #[inline]
    pub fn panel(&self) -> usize {
        self.panel
    }

    #[inline]
    pub fn target(&self) -> &MenuTarget {
        &self.target
    }

    #[inline]
    pub fn items(&self) -> &[MenuAction] {
        &self.items
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn anchor(&self) -> (u16, u16) {
        self.anchor
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).copied()
    }

    pub fn contains(&self, action: MenuAction) -> bool {
        self.items.contains(&action)
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    /// Remembers where the renderer placed the menu, for mouse hit tests.
    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Index of the item drawn at screen position `(x, y)`. The menu is drawn with a border.
    pub fn item_at(&self, x: u16, y: u16) -> Option<usize> {
        let area = self.area?;
        if x <= area.x || x >= area.right().saturating_sub(1) {
            return None;
        }
        if y <= area.y || y >= area.bottom().saturating_sub(1) {
            return None;
        }
        let idx = (y - area.y - 1) as usize;
        (idx < self.items.len()).then_some(idx)
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.items.len() {
            self.selected = idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dir() -> MenuTarget {
        MenuTarget::Dir(Entry::new(PathBuf::from("/proj/src"), true))
    }

    fn file() -> MenuTarget {
        MenuTarget::File(Entry::new(PathBuf::from("/proj/README.md"), false))
    }

    #[test]
    fn test_file_menu_with_defaults() {
        let items = actions_for(&file(), &Capabilities::default());
        assert_eq!(
            items,
            vec![
                MenuAction::Open,
                MenuAction::RenameFile,
                MenuAction::RemoveFile,
                MenuAction::CopyRelativePath,
                MenuAction::CopyFullPath,
            ]
        );
    }

    #[test]
    fn test_dir_menu_defaults_hide_remove_dir() {
        let items = actions_for(&dir(), &Capabilities::default());
        assert_eq!(
            items,
            vec![
                MenuAction::NewFile,
                MenuAction::NewDir,
                MenuAction::RenameDir,
                MenuAction::CopyRelativePath,
                MenuAction::CopyFullPath,
            ]
        );
    }

    #[test]
    fn test_rename_dir_gate_is_independent() {
        let flags = [true, false];
        for create_file in flags {
            for create_dir in flags {
                for remove_dir in flags {
                    let caps = Capabilities {
                        can_create_file: create_file,
                        can_create_dir: create_dir,
                        can_remove_dir: remove_dir,
                        can_rename_dir: false,
                        ..Capabilities::all()
                    };
                    let items = actions_for(&dir(), &caps);
                    assert!(!items.contains(&MenuAction::RenameDir));
                    assert_eq!(items.contains(&MenuAction::NewFile), create_file);
                    assert_eq!(items.contains(&MenuAction::NewDir), create_dir);
                    assert_eq!(items.contains(&MenuAction::RemoveDir), remove_dir);
                }
            }
        }
    }

    #[test]
    fn test_background_menu() {
        let items = actions_for(&MenuTarget::Background, &Capabilities::read_only());
        assert_eq!(items, vec![MenuAction::CopyRootPath]);

        let items = actions_for(&MenuTarget::Background, &Capabilities::all());
        assert_eq!(
            items,
            vec![MenuAction::NewFile, MenuAction::NewDir, MenuAction::CopyRootPath]
        );
    }

    #[test]
    fn test_item_hit_testing_and_wrapping() {
        let mut menu = ContextMenu::new(0, file(), &Capabilities::default(), (4, 4));
        assert_eq!(menu.item_at(5, 5), None);

        menu.set_area(Rect::new(4, 4, 22, 7));
        assert_eq!(menu.item_at(4, 5), None);
        assert_eq!(menu.item_at(5, 4), None);
        assert_eq!(menu.item_at(5, 5), Some(0));
        assert_eq!(menu.item_at(10, 9), Some(4));
        assert_eq!(menu.item_at(10, 10), None);

        menu.move_up();
        assert_eq!(menu.selected_action(), Some(MenuAction::CopyFullPath));
        menu.move_down();
        assert_eq!(menu.selected_action(), Some(MenuAction::Open));
    }
}
