//! The main config loading module for canopy.
//!
//! Handles loading and deserializing settings from `canopy.toml`.
//!
//! Provides the main [Config] struct and the internal [RawConfig] used for parsing.
//! A missing or broken file never stops canopy from starting: it falls back to defaults.

use crate::config::{Capabilities, Editor, General};
use crate::utils::get_home;

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};

/// Raw configuration as read from the toml file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    capabilities: Capabilities,
    editor: Editor,
}

/// Main configuration struct for canopy.
#[derive(Debug, Clone, Default)]
pub struct Config {
    general: General,
    capabilities: Capabilities,
    editor: Editor,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: raw.general,
            capabilities: raw.capabilities,
            editor: raw.editor,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    /// Falls back to the defaults when the file is missing or does not parse.
    pub fn load() -> Self {
        let path = Self::default_path();

        if !path.exists() {
            tracing::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path, with the same fallback as [Config::load].
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Error parsing config: {}", e);
                    tracing::warn!("error parsing {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    /// Applies command-line overrides: positional roots replace the configured ones,
    /// extra exclusion patterns are appended.
    pub fn apply_overrides(&mut self, roots: Vec<String>, exclude: Vec<String>) {
        if !roots.is_empty() {
            self.general.set_roots(roots);
        }
        self.general.extend_exclude(exclude);
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &General {
        &self.general
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Determine the default configuration file path.
    /// Checks the CANOPY_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME, then ~/.config/canopy/canopy.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("CANOPY_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("canopy/canopy.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/canopy/canopy.toml");
        }
        PathBuf::from("canopy.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {}", path.display());
        Ok(())
    }
}

pub(crate) const DEFAULT_TOML: &str = r##"# canopy.toml - default configuration for canopy

# Commented values are the internal defaults.

[general]
# Directories shown as independent panels, top to bottom.
# Positional command-line arguments replace this list.
# roots = ["~/projects/app", "~/projects/lib"]

# Glob patterns matched against the full path. `*` also matches path separators.
exclude = ["*/.git", "*/target", "*/__pycache__"]

# Nerd Font icons in front of entries
# icons = false

# Relative panel heights, one per root
# panel_ratios = [2, 1]

[capabilities]
# can_create_file = true
# can_rename_file = true
# can_remove_file = true
# can_create_dir = true
# can_rename_dir = true
# can_remove_dir = false
# confirm_removal = true

[editor]
# cmd = "nvim"
"##;

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use tempfile::tempdir;

    #[test]
    fn test_default_toml_parses_to_defaults() -> Result<(), Box<dyn error::Error>> {
        let cfg = Config::from_toml(DEFAULT_TOML)?;
        assert_eq!(cfg.capabilities(), Capabilities::default());
        assert_eq!(cfg.general().exclude().len(), 3);
        assert!(cfg.general().roots().is_empty());
        Ok(())
    }

    #[test]
    fn test_sections_override_defaults() -> Result<(), Box<dyn error::Error>> {
        let cfg = Config::from_toml(
            r#"
            [general]
            roots = ["/srv/a", "/srv/b"]
            exclude = []
            panel_ratios = [3, 1]

            [capabilities]
            can_remove_dir = true
            confirm_removal = false

            [editor]
            cmd = "hx"
            "#,
        )?;
        assert_eq!(
            cfg.general().roots(),
            vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]
        );
        assert!(cfg.general().exclude().is_empty());
        assert_eq!(cfg.general().panel_ratios(), &[3, 1]);
        assert!(cfg.capabilities().can_remove_dir);
        assert!(!cfg.capabilities().confirm_removal);
        assert_eq!(cfg.editor().cmd(), "hx");
        Ok(())
    }

    #[test]
    fn test_overrides_replace_roots_and_append_patterns() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vec!["/x".into()], vec!["*.log".into()]);
        assert_eq!(cfg.general().roots(), vec![PathBuf::from("/x")]);
        assert!(cfg.general().exclude().iter().any(|p| p == "*.log"));
        assert!(cfg.general().exclude().iter().any(|p| p == "*/.git"));

        cfg.apply_overrides(Vec::new(), Vec::new());
        assert_eq!(cfg.general().roots(), vec![PathBuf::from("/x")]);
    }

    #[test]
    fn test_invalid_file_falls_back() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("canopy.toml");
        fs::write(&path, "[capabilities]\ncan_create_file = \"nope\"")?;
        let cfg = Config::load_from(&path);
        assert_eq!(cfg.capabilities(), Capabilities::default());
        Ok(())
    }

    #[test]
    fn test_generate_default_refuses_overwrite() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/canopy.toml");
        Config::generate_default(&path)?;
        assert!(path.exists());
        assert!(Config::generate_default(&path).is_err());
        Ok(())
    }
}
