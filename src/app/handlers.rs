//! Input handlers for canopy.
//!
//! This module implements [Forest] methods that process key and mouse events. Input goes to
//! the first of: the open modal, the open context menu, the panels.

use crate::app::forest::Forest;

use crossterm::event::{
    KeyCode::*, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};

/// Two presses on the same cell within this window are a double-click.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Rows scrolled per wheel notch.
const WHEEL_STEP: isize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    Quit,
}

/// Detects double-clicks from a stream of left presses.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Instant, u16, u16)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a press. Returns true if it completes a double-click.
    pub fn register(&mut self, x: u16, y: u16, now: Instant) -> bool {
        if let Some((at, lx, ly)) = self.last
            && lx == x
            && ly == y
            && now.saturating_duration_since(at) <= DOUBLE_CLICK
        {
            self.last = None;
            return true;
        }
        self.last = Some((now, x, y));
        false
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Forest {
    /// Handles a key press. Returns a [KeypressResult] telling the loop what happened.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.modal().is_some() {
            self.modal_key(key);
            return KeypressResult::Consumed;
        }
        if self.menu().is_some() {
            return self.handle_menu_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == Char('c') {
            return KeypressResult::Quit;
        }

        match key.code {
            Char('q') => KeypressResult::Quit,
            Up | Char('k') => {
                self.focused_panel_mut().move_up();
                KeypressResult::Consumed
            }
            Down | Char('j') => {
                self.focused_panel_mut().move_down();
                KeypressResult::Consumed
            }
            Tab => {
                self.focus_next();
                KeypressResult::Consumed
            }
            BackTab => {
                self.focus_prev();
                KeypressResult::Consumed
            }
            Enter | Char('l') | Char('o') => {
                self.activate_selected();
                KeypressResult::Consumed
            }
            Char('m') | Menu => {
                self.context_request_selected();
                KeypressResult::Consumed
            }
            PageUp => {
                let step = self.focused_panel_mut().body_height() as isize;
                self.focused_panel_mut().scroll_by(-step);
                KeypressResult::Consumed
            }
            PageDown => {
                let step = self.focused_panel_mut().body_height() as isize;
                self.focused_panel_mut().scroll_by(step);
                KeypressResult::Consumed
            }
            _ => KeypressResult::Continue,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> KeypressResult {
        match key.code {
            Up | Char('k') => {
                if let Some(menu) = self.menu_mut() {
                    menu.move_up();
                }
            }
            Down | Char('j') => {
                if let Some(menu) = self.menu_mut() {
                    menu.move_down();
                }
            }
            Enter => {
                self.invoke_selected();
            }
            Esc | Char('q') | Char('m') => self.close_menu(),
            _ => {}
        }
        KeypressResult::Consumed
    }

    /// Handles a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, clicks: &mut ClickTracker) -> KeypressResult {
        self.handle_mouse_at(mouse, clicks, Instant::now())
    }

    pub(crate) fn handle_mouse_at(
        &mut self,
        mouse: MouseEvent,
        clicks: &mut ClickTracker,
        now: Instant,
    ) -> KeypressResult {
        let (x, y) = (mouse.column, mouse.row);

        if self.modal().is_some() {
            if let MouseEventKind::Down(_) = mouse.kind {
                self.modal_click(x, y);
            }
            return KeypressResult::Consumed;
        }

        if self.menu().is_some() {
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let hit = self.menu().and_then(|m| m.item_at(x, y));
                    match hit {
                        Some(idx) => {
                            if let Some(menu) = self.menu_mut() {
                                menu.select(idx);
                            }
                            self.invoke_selected();
                        }
                        None => self.close_menu(),
                    }
                    clicks.reset();
                    return KeypressResult::Consumed;
                }
                MouseEventKind::Down(MouseButton::Right) => {
                    // reopen at the new position
                    self.close_menu();
                }
                MouseEventKind::Down(_) => {
                    self.close_menu();
                    return KeypressResult::Consumed;
                }
                _ => return KeypressResult::Continue,
            }
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((idx, local_y)) = self.panel_at(y) else {
                    return KeypressResult::Continue;
                };
                self.set_focus(idx);
                let Some(row) = self.panel(idx).and_then(|p| p.row_at(local_y)) else {
                    clicks.reset();
                    return KeypressResult::Consumed;
                };
                if let Some(panel) = self.panel_mut(idx) {
                    panel.select(row);
                }
                if clicks.register(x, y, now) {
                    self.activate(idx, row);
                }
                KeypressResult::Consumed
            }
            MouseEventKind::Down(MouseButton::Right) => {
                clicks.reset();
                if self.context_request(x, y) {
                    KeypressResult::Consumed
                } else {
                    KeypressResult::Continue
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let Some((idx, _)) = self.panel_at(y) else {
                    return KeypressResult::Continue;
                };
                let delta = if mouse.kind == MouseEventKind::ScrollUp {
                    -WHEEL_STEP
                } else {
                    WHEEL_STEP
                };
                if let Some(panel) = self.panel_mut(idx) {
                    panel.scroll_by(delta);
                }
                KeypressResult::Consumed
            }
            _ => KeypressResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capabilities;
    use crate::core::ExcludeFilter;
    use crate::core::events::FsEvent;

    use ratatui::layout::Rect;
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    fn press(button: MouseButton, x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: crossterm::event::KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn forest() -> Result<(tempfile::TempDir, Forest), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("docs"))?;
        fs::write(dir.path().join("notes.txt"), "")?;
        let mut forest = Forest::new(
            vec![dir.path().to_path_buf()],
            ExcludeFilter::empty(),
            Capabilities::default(),
        )?;
        forest.set_layout(Rect::new(0, 0, 30, 10), &[Rect::new(0, 0, 30, 10)]);
        Ok((dir, forest))
    }

    #[test]
    fn test_click_tracker_window() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!clicks.register(3, 4, t0));
        assert!(clicks.register(3, 4, t0 + Duration::from_millis(200)));
        // a third press starts over
        assert!(!clicks.register(3, 4, t0 + Duration::from_millis(300)));
        assert!(!clicks.register(3, 5, t0 + Duration::from_millis(350)));
        assert!(!clicks.register(3, 5, t0 + Duration::from_millis(900)));
    }

    #[test]
    fn test_double_click_file_emits_once_dir_never() -> Result<(), Box<dyn error::Error>> {
        let (dir, mut forest) = forest()?;
        let rx = forest.events_mut().channel();
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(100);

        // row 0 (y = 1) is docs/, row 1 (y = 2) is notes.txt
        forest.handle_mouse_at(press(MouseButton::Left, 4, 1), &mut clicks, t0);
        forest.handle_mouse_at(press(MouseButton::Left, 4, 1), &mut clicks, later);
        assert!(forest.panels()[0].tree().is_expanded(&dir.path().join("docs")));
        assert_eq!(rx.try_iter().count(), 0);

        // docs/ is empty, so notes.txt stays on row 1
        let t1 = t0 + Duration::from_secs(2);
        forest.handle_mouse_at(press(MouseButton::Left, 4, 2), &mut clicks, t1);
        forest.handle_mouse_at(
            press(MouseButton::Left, 4, 2),
            &mut clicks,
            t1 + Duration::from_millis(100),
        );
        let events: Vec<FsEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![FsEvent::OpenFile(dir.path().join("notes.txt"))]);
        Ok(())
    }

    #[test]
    fn test_modal_captures_input_and_outside_click_closes() -> Result<(), Box<dyn error::Error>> {
        let (_dir, mut forest) = forest()?;
        let mut clicks = ClickTracker::new();

        forest.handle_mouse(press(MouseButton::Right, 4, 1), &mut clicks);
        assert!(forest.menu().is_some());
        forest.invoke(crate::app::menu::MenuAction::NewFile);
        assert!(forest.modal().is_some());

        // 'q' is text while the dialog is open
        assert_eq!(forest.handle_keypress(key(Char('q'))), KeypressResult::Consumed);
        assert!(forest.modal().is_some());

        if let Some(modal) = forest.modal_mut() {
            modal.set_area(Rect::new(5, 2, 20, 6));
        }
        forest.handle_mouse(press(MouseButton::Left, 0, 9), &mut clicks);
        assert!(forest.modal().is_none());
        assert_eq!(forest.handle_keypress(key(Char('q'))), KeypressResult::Quit);
        Ok(())
    }

    #[test]
    fn test_menu_keyboard_navigation() -> Result<(), Box<dyn error::Error>> {
        let (_dir, mut forest) = forest()?;
        forest.handle_keypress(key(Down));
        assert_eq!(forest.panels()[0].selected(), 1);
        forest.handle_keypress(key(Char('m')));
        let first = forest.menu().and_then(|m| m.selected_action());
        assert_eq!(first, Some(crate::app::menu::MenuAction::Open));
        forest.handle_keypress(key(Esc));
        assert!(forest.menu().is_none());
        Ok(())
    }
}
