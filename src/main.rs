//! main.rs
//! Entry point for canopy

use canopy_tui::app::CanopyRoot;
use canopy_tui::config::Config;
use canopy_tui::core::terminal;
use canopy_tui::utils::cli::{CliAction, handle_args};
use canopy_tui::utils::init_logging;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[canopy] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let args = match handle_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Fail => std::process::exit(1),
        CliAction::Run(args) => args,
    };

    init_logging();

    let mut config = Config::load();
    config.apply_overrides(args.roots, args.exclude);

    let mut root = match CanopyRoot::new(&config) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("\n[canopy] Error: {}", e);
            std::process::exit(1);
        }
    };

    if !config.editor().exists() {
        tracing::warn!("editor '{}' not found in PATH", config.editor().cmd());
    }

    let result = terminal::run_terminal(&mut root);
    root.shutdown();
    result
}
