//! Command-line argument parsing and help for canopy.
//!
//! When invoked with no arguments (cnp), canopy opens the configured roots, or the current
//! directory when none are configured.

use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    Run(CliArgs),
    Exit,
    /// Bad arguments or a failed one-shot command. The message is already printed.
    Fail,
}

/// Overrides collected from the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub roots: Vec<String>,
    pub exclude: Vec<String>,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Parses arguments (without the program name).
pub fn parse_args(args: &[String]) -> CliAction {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                print_version();
                return CliAction::Exit;
            }
            "-h" | "--help" => {
                print_help();
                return CliAction::Exit;
            }
            "--config-help" => {
                print_config_help();
                return CliAction::Exit;
            }
            "--init" => {
                if let Err(e) = Config::generate_default(&Config::default_path()) {
                    eprintln!("Error: {}", e);
                    return CliAction::Fail;
                }
                return CliAction::Exit;
            }
            "-e" | "--exclude" => match iter.next() {
                Some(pat) => parsed.exclude.push(pat.clone()),
                None => {
                    eprintln!("Error: {} expects a pattern", arg);
                    return CliAction::Fail;
                }
            },
            a if a.starts_with("--exclude=") => {
                parsed.exclude.push(a["--exclude=".len()..].to_string());
            }
            "--" => {
                parsed.roots.extend(iter.by_ref().cloned());
            }
            a if !a.starts_with('-') && !a.trim().is_empty() => {
                parsed.roots.push(a.to_string());
            }
            a => {
                eprintln!("Unknown argument: {}", a);
                eprintln!("Try --help for available options");
                return CliAction::Fail;
            }
        }
    }

    CliAction::Run(parsed)
}

fn print_version() {
    println!("canopy {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"canopy - A multi-root file tree browser for the terminal

USAGE:
  cnp [OPTIONS] [ROOT]...

ROOT:
  Directories to show as panels, top to bottom (defaults to the configured
  roots, or the current directory)

OPTIONS:
  -e, --exclude <PATTERN> Hide paths matching PATTERN (repeatable, full-path glob)
      --init              Generate a default configuration file
      --config-help       Display all the configuration options
  -h, --help              Print help information
  -v, --version           Display the current installed version of canopy

KEYS & MOUSE:
  up/down, j/k            Move the selection
  tab / shift-tab         Focus next / previous panel
  enter, double-click     Open file, expand or collapse directory
  m, right-click          Context menu
  q                       Quit

ENVIRONMENT:
  CANOPY_CONFIG           Override the default config path
  CANOPY_LOG              Write logs to this file
  CANOPY_LOG_LEVEL        Log filter (default: info)
"#
    );
}

fn print_config_help() {
    println!(
        r##"
canopy - Configuration Guide (canopy.toml)

[general]
  roots                      Directories shown as panels, e.g. ["~/app", "~/lib"]
  exclude                    Glob patterns matched against the full path
                             ("*" also matches "/"), e.g. ["*/.git", "*.pyc"]
  icons                      Show Nerd Font icons [default: false]
  panel_ratios               Relative panel heights, one per root, e.g. [2, 1]

[capabilities]
  can_create_file            Offer "New file" [default: true]
  can_rename_file            Offer "Rename file" [default: true]
  can_remove_file            Offer "Remove file" [default: true]
  can_create_dir             Offer "New subdir" [default: true]
  can_rename_dir             Offer "Rename dir" [default: true]
  can_remove_dir             Offer "Remove dir" [default: false]
  confirm_removal            Ask before moving to trash [default: true]

[editor]
  cmd                        Command used to open files (default: $EDITOR or "nvim")
"##
    );
}
