//! The main config loading module for filebeam.
//!
//! Handles loading and deserializing settings from `filebeam.toml`.
//!
//! Provides the main [Config] struct, the internal [RawConfig] used for parsing, and
//! [ConfigError] for files that exist but cannot be used.

use crate::config::{Display, General, InternalGeneral, Keys, LogConfig, Opener};
use crate::utils::get_home;

use serde::Deserialize;
use thiserror::Error;

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file
/// This struct is deserialized directly from the toml file.
/// It uses owned types and is then converted into the main [Config] struct.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    display: Display,
    keys: Keys,
    opener: Opener,
    log: LogConfig,
}

/// Main configuration struct for filebeam
#[derive(Debug)]
pub struct Config {
    general: InternalGeneral,
    display: Display,
    keys: Keys,
    opener: Opener,
    log: LogConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Conversion from RawConfig to Config
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            display: raw.display,
            keys: raw.keys,
            opener: raw.opener,
            log: raw.log,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file silently yields the defaults. A file that cannot be read or parsed yields
    /// the defaults with a warning on stderr; this runs before the TUI owns the terminal.
    pub fn load() -> Self {
        let path = Self::default_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[filebeam] {}. Using internal defaults.", e);
                Self::default()
            }
        }
    }

    /// Reads and parses the config file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&content)?;
        Ok(raw.into())
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    #[inline]
    pub fn opener(&self) -> &Opener {
        &self.opener
    }

    #[inline]
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    /// Determine the default configuration file path.
    /// Checks the FILEBEAM_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/filebeam/filebeam.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FILEBEAM_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("filebeam/filebeam.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/filebeam/filebeam.toml");
        }
        PathBuf::from("filebeam.toml")
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
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}

/// Default configuration options
impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

const DEFAULT_TOML: &str = r##"# filebeam.toml - default configuration for filebeam
# Commented values are the internal defaults.

[general]
# show_hidden = false
# move_to_trash = false     # delete into the system trash instead of removing
# size_workers = 2          # threads computing directory sizes (1..=16)

[display]
# usage_column = true       # share of the device capacity per entry
# modified_column = true
# message_secs = 4
# tick_ms = 500             # redraw interval while sizes are calculating

# [opener]
# cmd = ""                  # prefilled program for "open with"

# [log]
# level = "info"            # overridden by FILEBEAM_LOG
# dir = "~/.cache/filebeam"

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_parent = ["h", "Left", "Backspace"]
# go_into_dir = ["l", "Right", "Enter"]
# quit = ["q"]
# toggle_select = ["space"]
# clear_selection = ["u"]
# delete = ["d"]
# delete_immediate = ["Shift+d"]
# open_with = ["o"]
# move_file = ["m"]
# copy = ["c"]
# rename = ["r"]
"##;

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn partial_config_keeps_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawConfig = toml::from_str(
            r#"
            [general]
            show_hidden = true

            [keys]
            quit = ["x"]
            "#,
        )?;
        let config = Config::from(raw);

        assert!(config.general().show_hidden());
        assert!(!config.general().move_to_trash());
        assert_eq!(config.general().size_workers(), 2);
        assert_eq!(config.keys().quit(), ["x".to_string()]);
        assert_eq!(config.keys().go_up(), ["k".to_string(), "Up".to_string()]);
        assert!(config.display().usage_column());
        assert_eq!(config.opener().cmd(), "");
        assert_eq!(config.log().level(), "info");
        Ok(())
    }

    #[test]
    fn out_of_range_values_are_clamped() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawConfig = toml::from_str(
            r#"
            [general]
            size_workers = 0

            [display]
            tick_ms = 5
            "#,
        )?;
        let config = Config::from(raw);
        assert_eq!(config.general().size_workers(), 1);
        assert_eq!(config.display().tick_interval(), Duration::from_millis(100));
        Ok(())
    }

    #[test]
    fn broken_file_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("filebeam.toml");
        fs::write(&path, "[general\nshow_hidden = ")?;
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));
        Ok(())
    }

    #[test]
    fn generated_default_parses_and_is_not_overwritten() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempdir()?;
        let path = dir.path().join("cfg").join("filebeam.toml");

        Config::generate_default(&path)?;
        let config = Config::from_file(&path)?;
        assert_eq!(config.keys().delete(), ["d".to_string()]);

        let again = Config::generate_default(&path);
        assert_eq!(
            again.map_err(|e| e.kind()),
            Err(io::ErrorKind::AlreadyExists)
        );
        Ok(())
    }
}
