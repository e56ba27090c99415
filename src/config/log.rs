//! Logging configuration for filebeam, read from the `[log]` table.

use serde::Deserialize;

use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct LogConfig {
    level: String,
    dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".into(),
            dir: None,
        }
    }
}

impl LogConfig {
    /// Filter directive used when `FILEBEAM_LOG` is not set.
    #[inline]
    pub fn level(&self) -> &str {
        let trimmed = self.level.trim();
        if trimmed.is_empty() { "info" } else { trimmed }
    }

    /// Configured log directory, if any.
    #[inline]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}
