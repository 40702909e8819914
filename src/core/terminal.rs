//! Terminal rendering and event loop for canopy.
//!
//! Handles setup/teardown of raw mode, alternate screen and mouse capture, redraws, and
//! dispatches key, mouse and resize events to the container.

use crate::app::{CanopyRoot, KeypressResult};
use crate::ui;
use crate::utils::open_in_editor;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::{io, time::Duration};

/// Initializes the terminal and runs the main event loop. Blocks until quit.
///
/// Returns an std::io::Error if terminal setup or teardown fails.
pub fn run_terminal(root: &mut CanopyRoot) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, root);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    )?;
    result
}

/// Main event loop: drains the runtime, draws, polls for input. Returns on quit.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, root: &mut CanopyRoot) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    let mut dirty = true;
    loop {
        dirty |= root.update();

        let requests = root.take_open_requests();
        if !requests.is_empty() {
            for path in requests {
                if let Err(e) = open_in_editor(root.editor(), &path) {
                    tracing::warn!("cannot open {}: {}", path.display(), e);
                    root.set_status(format!("Error opening editor: {}", e));
                }
            }
            // the editor owned the screen
            terminal.clear()?;
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui::render(f, root))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let KeypressResult::Quit = root.forest.handle_keypress(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Mouse(mouse) => {
                    if root.forest.handle_mouse(mouse, &mut root.clicks) != KeypressResult::Continue {
                        dirty = true;
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
