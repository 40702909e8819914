//! Helpers for canopy.
//!
//! Small utilities used across canopy:
//! - Expanding and shortening `~` in paths
//! - Resolving command-line roots into canonical directories
//! - Opening a file in the configured editor from inside the TUI
//! - Installing the file-backed tracing subscriber

use crate::config::Editor;

use std::fs::OpenOptions;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::Mutex;
use std::{io, process};

use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file. Logging is off when it is unset.
pub const LOG_ENV: &str = "CANOPY_LOG";
/// Environment variable holding the log filter, e.g. `debug` or `canopy_tui=trace`.
pub const LOG_LEVEL_ENV: &str = "CANOPY_LOG_LEVEL";

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` to the home directory.
pub fn expand_home_path(path: &str) -> PathBuf {
    if path == "~" {
        return get_home().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix(&format!("~{}", MAIN_SEPARATOR)))
        && let Some(home) = get_home()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Util function to shorten home directory to ~.
/// Used for panel titles.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

/// Turns a root argument into an absolute, canonical directory path.
pub fn resolve_root(path: &Path) -> io::Result<PathBuf> {
    let canonical = path.canonicalize()?;
    if !canonical.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("'{}' is not a directory", path.display()),
        ));
    }
    Ok(canonical)
}

/// Opens a specified path/file in the configured editor ("nvim" or "vim" etc.).
///
/// Temporary disables raw mode, mouse capture and the alternate screen while the editor runs.
/// On return, restores them.
pub fn open_in_editor(editor: &Editor, file_path: &Path) -> io::Result<()> {
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };

    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;

    let status = process::Command::new(editor.cmd()).arg(file_path).status();

    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    enable_raw_mode()?;
    status.map(|_| ())
}

/// Installs a tracing subscriber writing to the file named by [LOG_ENV].
///
/// The terminal belongs to the UI, so there is no stderr logging. Returns false when logging
/// stays disabled.
pub fn init_logging() -> bool {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return false;
    };

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("[canopy] cannot open log file '{}': {}", path, e);
            return false;
        }
    };

    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
