//! Mutation dialogs for canopy.
//!
//! Three modals collect what a mutation needs before it runs:
//! - [NameDialog] in its "new item" form asks for the name of a file or directory to create,
//! - [NameDialog] in its "rename" form asks for the new name of an existing entry,
//! - [ConfirmDeleteDialog] asks before an entry is moved to the trash.
//!
//! Name dialogs re-check the prospective path after every edit and show whether it is free.
//! A dialog never submits an empty name. Key handling returns a [DialogOutcome]; the caller
//! closes the dialog on anything but [DialogOutcome::Pending].

use crate::core::mutate::{Mutation, PendingOperation};
use crate::core::paths::{self, add_path, relative_path};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Result of feeding one input to a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Pending,
    Submitted(String),
    Confirmed,
    Cancelled,
}

/// Single-line text input with a cursor and an optional "everything selected" state.
///
/// While everything is selected, the first typed character replaces the whole text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    buffer: String,
    cursor: usize,
    all_selected: bool,
}

impl LineInput {
    pub fn new(initial: &str, select_all: bool) -> Self {
        Self {
            buffer: initial.to_string(),
            cursor: initial.len(),
            all_selected: select_all && !initial.is_empty(),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    /// Drops the selection. Returns true if there was one.
    fn take_selection(&mut self) -> bool {
        std::mem::take(&mut self.all_selected)
    }

    pub fn insert(&mut self, ch: char) {
        if self.take_selection() {
            self.buffer.clear();
            self.cursor = 0;
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.take_selection() {
            self.clear();
            return;
        }
        if self.cursor > 0
            && let Some((previous, _)) = self.buffer[..self.cursor].char_indices().next_back()
        {
            self.buffer.remove(previous);
            self.cursor = previous;
        }
    }

    pub fn delete(&mut self) {
        if self.take_selection() {
            self.clear();
            return;
        }
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if self.take_selection() {
            self.cursor = 0;
            return;
        }
        if let Some((previous, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.cursor = previous;
        }
    }

    pub fn right(&mut self) {
        if self.take_selection() {
            self.cursor = self.buffer.len();
            return;
        }
        if let Some(ch) = self.buffer[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.all_selected = false;
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.all_selected = false;
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.all_selected = false;
    }

    /// Applies an editing key. Returns false for keys that are not editing keys.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }
}

/// Live feedback for the name currently typed into a [NameDialog].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameStatus {
    Empty,
    /// Nothing exists at the prospective path (relative to the root).
    Free(String),
    /// Something already exists there. Submitting is still allowed and will fail.
    Taken(String),
}

impl NameStatus {
    pub fn is_taken(&self) -> bool {
        matches!(self, NameStatus::Taken(_))
    }
}

/// Quotes a path for the status line: single quotes unless the text itself contains one.
fn quoted(text: &str) -> String {
    if text.contains('\'') && !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        format!("'{}'", text.replace('\'', "\\'"))
    }
}

fn kind_word(is_file: bool) -> &'static str {
    if is_file { "file" } else { "dir" }
}

fn kind_title(is_file: bool) -> &'static str {
    if is_file { "File" } else { "Dir" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDialogKind {
    NewItem,
    Rename,
}

/// New-item and rename dialog.
#[derive(Debug, Clone)]
pub struct NameDialog {
    kind: NameDialogKind,
    pending: PendingOperation,
    root: PathBuf,
    parent: PathBuf,
    original: Option<String>,
    input: LineInput,
    status: NameStatus,
    area: Option<Rect>,
}

impl NameDialog {
    /// Dialog for creating a file (`is_file`) or directory inside `parent`.
    pub fn new_item(root_idx: usize, root: &Path, parent: &Path, is_file: bool) -> Self {
        let mutation = if is_file {
            Mutation::CreateFile {
                parent: parent.to_path_buf(),
            }
        } else {
            Mutation::CreateDir {
                parent: parent.to_path_buf(),
            }
        };
        let mut dialog = Self {
            kind: NameDialogKind::NewItem,
            pending: PendingOperation::new(root_idx, mutation),
            root: root.to_path_buf(),
            parent: parent.to_path_buf(),
            original: None,
            input: LineInput::default(),
            status: NameStatus::Empty,
            area: None,
        };
        dialog.refresh_status();
        dialog
    }

    /// Dialog for renaming `name` inside `parent`. The input starts with the current name,
    /// fully selected.
    ///
    /// The mutation keeps `name` as given. Only the displayed text is lossily converted.
    pub fn rename_item(
        root_idx: usize,
        root: &Path,
        parent: &Path,
        name: &OsStr,
        is_file: bool,
    ) -> Self {
        let mutation = if is_file {
            Mutation::RenameFile {
                parent: parent.to_path_buf(),
                name: name.to_os_string(),
            }
        } else {
            Mutation::RenameDir {
                parent: parent.to_path_buf(),
                name: name.to_os_string(),
            }
        };
        let shown = name.to_string_lossy();
        let mut dialog = Self {
            kind: NameDialogKind::Rename,
            pending: PendingOperation::new(root_idx, mutation),
            root: root.to_path_buf(),
            parent: parent.to_path_buf(),
            original: Some(shown.to_string()),
            input: LineInput::new(&shown, true),
            status: NameStatus::Empty,
            area: None,
        };
        dialog.refresh_status();
        dialog
    }

    #[inline]
    pub fn kind(&self) -> NameDialogKind {
        self.kind
    }

    #[inline]
    pub fn pending(&self) -> &PendingOperation {
        &self.pending
    }

    #[inline]
    pub fn input(&self) -> &LineInput {
        &self.input
    }

    #[inline]
    pub fn status(&self) -> &NameStatus {
        &self.status
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.pending.mutation.targets_file()
    }

    /// Informational lines shown above the input.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Project name: {}", paths::dir_name(&self.root))];
        match (&self.kind, &self.original) {
            (NameDialogKind::Rename, Some(name)) => {
                lines.push(format!("Rename {} from: {}", kind_word(self.is_file()), name));
            }
            _ => lines.push(format!(
                "Dir name: {}",
                relative_path(&self.root, &self.parent)
            )),
        }
        lines
    }

    pub fn prompt(&self) -> String {
        match self.kind {
            NameDialogKind::NewItem => format!("New {} name:", kind_word(self.is_file())),
            NameDialogKind::Rename => "To:".to_string(),
        }
    }

    /// Status line for the current input, or `None` when the input is empty.
    pub fn status_text(&self) -> Option<String> {
        let verb = match self.kind {
            NameDialogKind::NewItem => "created at",
            NameDialogKind::Rename => "renamed to",
        };
        match &self.status {
            NameStatus::Empty => None,
            NameStatus::Free(rel) => Some(format!(
                "{} will be {}: {}",
                kind_title(self.is_file()),
                verb,
                quoted(rel)
            )),
            NameStatus::Taken(rel) => Some(format!(
                "{} at {} already exists",
                kind_title(self.is_file()),
                quoted(rel)
            )),
        }
    }

    /// Recomputes the status from the live filesystem.
    pub fn refresh_status(&mut self) {
        let name = self.input.text();
        self.status = if name.is_empty() {
            NameStatus::Empty
        } else {
            let rel = relative_path(&self.root, &add_path(&self.parent, name));
            if paths::exists(&self.parent, name) {
                NameStatus::Taken(rel)
            } else {
                NameStatus::Free(rel)
            }
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Esc => DialogOutcome::Cancelled,
            KeyCode::Enter => {
                let name = self.input.text();
                if name.is_empty() {
                    DialogOutcome::Pending
                } else {
                    DialogOutcome::Submitted(name.to_string())
                }
            }
            _ => {
                if self.input.handle_key(key) {
                    self.refresh_status();
                }
                DialogOutcome::Pending
            }
        }
    }
}

/// Confirmation before a file or directory goes to the trash.
#[derive(Debug, Clone)]
pub struct ConfirmDeleteDialog {
    pending: PendingOperation,
    root: PathBuf,
    path: PathBuf,
    area: Option<Rect>,
    button: Option<Rect>,
}

impl ConfirmDeleteDialog {
    pub fn new(root_idx: usize, root: &Path, path: &Path, is_file: bool) -> Self {
        let mutation = if is_file {
            Mutation::RemoveFile {
                path: path.to_path_buf(),
            }
        } else {
            Mutation::RemoveDir {
                path: path.to_path_buf(),
            }
        };
        Self {
            pending: PendingOperation::new(root_idx, mutation),
            root: root.to_path_buf(),
            path: path.to_path_buf(),
            area: None,
            button: None,
        }
    }

    #[inline]
    pub fn pending(&self) -> &PendingOperation {
        &self.pending
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Project name: {}", paths::dir_name(&self.root)),
            format!(
                "Deleting {}: {}",
                kind_word(self.pending.mutation.targets_file()),
                relative_path(&self.root, &self.path)
            ),
            "Confirm delete".to_string(),
        ]
    }

    pub fn button_label(&self) -> &'static str {
        "Confirm"
    }

    pub fn set_button_area(&mut self, area: Rect) {
        self.button = Some(area);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => DialogOutcome::Confirmed,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => DialogOutcome::Cancelled,
            _ => DialogOutcome::Pending,
        }
    }
}

/// The single modal that may be open at a time.
#[derive(Debug, Clone)]
pub enum Modal {
    Name(NameDialog),
    ConfirmDelete(ConfirmDeleteDialog),
}

impl Modal {
    pub fn pending(&self) -> &PendingOperation {
        match self {
            Modal::Name(d) => d.pending(),
            Modal::ConfirmDelete(d) => d.pending(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match self {
            Modal::Name(d) => d.handle_key(key),
            Modal::ConfirmDelete(d) => d.handle_key(key),
        }
    }

    /// Mouse press at `(x, y)`. Outside the dialog cancels it; on the confirm button confirms.
    pub fn handle_click(&mut self, x: u16, y: u16) -> DialogOutcome {
        let inside = |r: Option<Rect>| {
            r.is_some_and(|r| x >= r.x && x < r.right() && y >= r.y && y < r.bottom())
        };
        if let Modal::ConfirmDelete(d) = self
            && inside(d.button)
        {
            return DialogOutcome::Confirmed;
        }
        let area = self.area();
        if area.is_some() && !inside(area) {
            DialogOutcome::Cancelled
        } else {
            DialogOutcome::Pending
        }
    }

    /// Remembers where the renderer placed the dialog.
    pub fn set_area(&mut self, area: Rect) {
        match self {
            Modal::Name(d) => d.area = Some(area),
            Modal::ConfirmDelete(d) => d.area = Some(area),
        }
    }

    pub fn area(&self) -> Option<Rect> {
        match self {
            Modal::Name(d) => d.area,
            Modal::ConfirmDelete(d) => d.area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use std::fs;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(dialog: &mut NameDialog, text: &str) {
        for c in text.chars() {
            assert_eq!(dialog.handle_key(key(KeyCode::Char(c))), DialogOutcome::Pending);
        }
    }

    #[test]
    fn test_line_input_editing() {
        let mut input = LineInput::new("héllo", false);
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.text(), "hélo");
        input.home();
        input.delete();
        assert_eq!(input.text(), "élo");
        input.right();
        input.insert('x');
        assert_eq!(input.text(), "éxlo");
        input.end();
        assert_eq!(input.cursor(), input.text().len());
    }

    #[test]
    fn test_select_all_replaced_by_first_keystroke() {
        let mut input = LineInput::new("old.txt", true);
        assert!(input.is_all_selected());
        input.insert('n');
        assert_eq!(input.text(), "n");
        assert!(!input.is_all_selected());

        let mut input = LineInput::new("old.txt", true);
        input.right();
        input.insert('2');
        assert_eq!(input.text(), "old.txt2");
    }

    #[test]
    fn test_new_item_texts_and_live_status() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let root = dir.path().join("proj");
        let src = root.join("src");
        fs::create_dir_all(&src)?;
        fs::write(src.join("main.rs"), "")?;

        let mut dialog = NameDialog::new_item(0, &root, &src, true);
        assert_eq!(
            dialog.header_lines(),
            vec!["Project name: proj".to_string(), "Dir name: src".to_string()]
        );
        assert_eq!(dialog.prompt(), "New file name:");
        assert_eq!(dialog.status_text(), None);

        type_str(&mut dialog, "lib.rs");
        assert_eq!(
            dialog.status_text().as_deref(),
            Some("File will be created at: 'src/lib.rs'")
        );

        dialog.handle_key(key(KeyCode::Backspace));
        dialog.handle_key(key(KeyCode::Backspace));
        dialog.handle_key(key(KeyCode::Backspace));
        dialog.handle_key(key(KeyCode::Backspace));
        dialog.handle_key(key(KeyCode::Backspace));
        dialog.handle_key(key(KeyCode::Backspace));
        type_str(&mut dialog, "main.rs");
        assert!(dialog.status().is_taken());
        assert_eq!(
            dialog.status_text().as_deref(),
            Some("File at 'src/main.rs' already exists")
        );
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogOutcome::Submitted("main.rs".into())
        );
        Ok(())
    }

    #[test]
    fn test_new_dir_at_root() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let root = dir.path();
        let mut dialog = NameDialog::new_item(1, root, root, false);
        assert_eq!(dialog.header_lines()[1], "Dir name: .");
        assert_eq!(dialog.prompt(), "New dir name:");
        type_str(&mut dialog, "docs");
        assert_eq!(
            dialog.status_text().as_deref(),
            Some("Dir will be created at: 'docs'")
        );
        assert_eq!(dialog.pending().root, 1);
        Ok(())
    }

    #[test]
    fn test_empty_name_never_submits() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut dialog = NameDialog::new_item(0, dir.path(), dir.path(), true);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogOutcome::Pending);

        let mut rename =
            NameDialog::rename_item(0, dir.path(), dir.path(), OsStr::new("a.txt"), true);
        rename.handle_key(key(KeyCode::Backspace));
        assert_eq!(rename.input().text(), "");
        assert_eq!(rename.status_text(), None);
        assert_eq!(rename.handle_key(key(KeyCode::Enter)), DialogOutcome::Pending);
        assert_eq!(rename.handle_key(key(KeyCode::Esc)), DialogOutcome::Cancelled);
        Ok(())
    }

    #[test]
    fn test_rename_same_name_shows_collision() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("it's.txt"), "")?;
        let dialog =
            NameDialog::rename_item(0, dir.path(), dir.path(), OsStr::new("it's.txt"), true);
        assert_eq!(dialog.header_lines()[1], "Rename file from: it's.txt");
        assert_eq!(dialog.prompt(), "To:");
        assert!(dialog.input().is_all_selected());
        assert_eq!(
            dialog.status_text().as_deref(),
            Some("File at \"it's.txt\" already exists")
        );
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rename_keeps_raw_name_for_the_mutation() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xff.txt");
        let root = Path::new("/proj");
        let dialog = NameDialog::rename_item(0, root, root, raw, true);
        assert_eq!(dialog.header_lines()[1], "Rename file from: caf\u{fffd}.txt");
        assert_eq!(
            dialog.pending().mutation,
            Mutation::RenameFile {
                parent: PathBuf::from("/proj"),
                name: raw.to_os_string(),
            }
        );
    }

    #[test]
    fn test_confirm_delete_keys_and_clicks() {
        let mut dialog = ConfirmDeleteDialog::new(
            0,
            Path::new("/proj"),
            Path::new("/proj/src/old.rs"),
            true,
        );
        assert_eq!(
            dialog.lines(),
            vec![
                "Project name: proj".to_string(),
                "Deleting file: src/old.rs".to_string(),
                "Confirm delete".to_string(),
            ]
        );
        assert_eq!(dialog.handle_key(key(KeyCode::Char('x'))), DialogOutcome::Pending);
        assert_eq!(dialog.handle_key(key(KeyCode::Char('y'))), DialogOutcome::Confirmed);
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogOutcome::Cancelled);

        dialog.set_button_area(Rect::new(20, 8, 11, 1));
        let mut modal = Modal::ConfirmDelete(dialog);
        modal.set_area(Rect::new(10, 3, 30, 7));
        assert_eq!(modal.handle_click(22, 8), DialogOutcome::Confirmed);
        assert_eq!(modal.handle_click(12, 4), DialogOutcome::Pending);
        assert_eq!(modal.handle_click(0, 0), DialogOutcome::Cancelled);
    }
}
