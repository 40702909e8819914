//! Icon providers for canopy panels.
//!
//! A host can install any [IconProvider] after construction. It is shared by every panel, so
//! all roots render with the same icon set. [NerdIcons] maps file types and well-known names
//! to Nerd Font glyphs, [NoIcons] renders nothing.

use crate::core::Entry;

use phf::phf_map;

/// Supplies the glyph drawn in front of an entry's name.
pub trait IconProvider: Send + Sync {
    fn icon(&self, entry: &Entry, expanded: bool) -> &str;
}

/// Plain text rendering: no glyphs at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconProvider for NoIcons {
    fn icon(&self, _entry: &Entry, _expanded: bool) -> &str {
        ""
    }
}

/// File extension to icon mapping.
static EXT_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "rs" => "\u{e7a8}",
    "py" => "\u{e606}",
    "js" => "\u{e74e}",
    "ts" => "\u{e628}",
    "md" => "\u{f48a}",
    "html" => "\u{e736}",
    "css" => "\u{e749}",
    "json" => "\u{e60b}",
    "toml" => "\u{f013}",
    "yaml" => "\u{f013}",
    "yml" => "\u{f013}",
    "ini" => "\u{f013}",
    "xml" => "\u{f013}",
    "sh" => "\u{e795}",
    "go" => "\u{e627}",
    "c" => "\u{e61e}",
    "cpp" => "\u{e61d}",
    "h" => "\u{f0fd}",
    "lua" => "\u{e620}",
    "lock" => "\u{f023}",
    "txt" => "\u{f0f6}",
    "log" => "\u{f4ed}",
    "png" => "\u{f03e}",
    "jpg" => "\u{f03e}",
    "jpeg" => "\u{f03e}",
    "gif" => "\u{f03e}",
    "svg" => "\u{f03e}",
    "zip" => "\u{f1c6}",
    "tar" => "\u{f1c6}",
    "gz" => "\u{f1c6}",
    "pdf" => "\u{f1c1}",
};

/// Special file names.
static SPECIAL_FILE_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "README.md" => "\u{f48a}",
    "README" => "\u{f48a}",
    "LICENSE" => "\u{f02d}",
    "Makefile" => "\u{e779}",
    ".gitignore" => "\u{e702}",
    "Cargo.toml" => "\u{e7a8}",
    "Cargo.lock" => "\u{f023}",
    "Dockerfile" => "\u{e7b0}",
    "package.json" => "\u{e718}",
    "requirements.txt" => "\u{e73c}",
    "setup.py" => "\u{e73c}",
};

/// Special directory names.
static SPECIAL_DIR_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    ".git" => "\u{e5fb}",
    ".github" => "\u{e5fd}",
    "node_modules" => "\u{e5fa}",
    ".config" => "\u{e5fc}",
};

const DIR_ICON: &str = "\u{e5ff}";
const DIR_OPEN_ICON: &str = "\u{e5fe}";
const FILE_ICON: &str = "\u{f0f6}";

/// Nerd Font glyphs by directory name, file name and extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct NerdIcons;

impl IconProvider for NerdIcons {
    fn icon(&self, entry: &Entry, expanded: bool) -> &str {
        let name = entry.name();

        if entry.is_dir() {
            if let Some(icon) = SPECIAL_DIR_ICON_MAP.get(name) {
                return icon;
            }
            return if expanded { DIR_OPEN_ICON } else { DIR_ICON };
        }

        if let Some(icon) = SPECIAL_FILE_ICON_MAP.get(name) {
            return icon;
        }

        if let Some(dot_idx) = name.rfind('.')
            && dot_idx > 0
            && dot_idx < name.len() - 1
        {
            let ext = &name[dot_idx + 1..];
            if let Some(icon) = EXT_ICON_MAP.get(ext) {
                return icon;
            }
            if let Some(icon) = EXT_ICON_MAP.get(ext.to_ascii_lowercase().as_str()) {
                return icon;
            }
        }

        FILE_ICON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_nerd_icons_lookup_order() {
        let icons = NerdIcons;
        let readme = Entry::new(PathBuf::from("/p/README.md"), false);
        let upper = Entry::new(PathBuf::from("/p/MAIN.RS"), false);
        let dotfile = Entry::new(PathBuf::from("/p/.rs"), false);
        let git = Entry::new(PathBuf::from("/p/.git"), true);
        let plain_dir = Entry::new(PathBuf::from("/p/src"), true);

        assert_eq!(icons.icon(&readme, false), "\u{f48a}");
        assert_eq!(icons.icon(&upper, false), "\u{e7a8}");
        assert_eq!(icons.icon(&dotfile, false), FILE_ICON);
        assert_eq!(icons.icon(&git, false), "\u{e5fb}");
        assert_eq!(icons.icon(&plain_dir, false), DIR_ICON);
        assert_eq!(icons.icon(&plain_dir, true), DIR_OPEN_ICON);
        assert_eq!(NoIcons.icon(&plain_dir, true), "");
    }
}
