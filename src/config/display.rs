//! Display configuration options for filebeam.
//!
//! Read from the `[display]` table of filebeam.toml.

use serde::Deserialize;

use std::time::Duration;

const MIN_TICK_MS: u64 = 100;
const MAX_TICK_MS: u64 = 5000;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Display {
    usage_column: bool,
    modified_column: bool,
    message_secs: u64,
    tick_ms: u64,
}

impl Default for Display {
    fn default() -> Self {
        Display {
            usage_column: true,
            modified_column: true,
            message_secs: 4,
            tick_ms: 500,
        }
    }
}

impl Display {
    #[inline]
    pub fn usage_column(&self) -> bool {
        self.usage_column
    }

    #[inline]
    pub fn modified_column(&self) -> bool {
        self.modified_column
    }

    /// How long transient notices stay in the footer.
    #[inline]
    pub fn message_duration(&self) -> Duration {
        Duration::from_secs(self.message_secs)
    }

    /// Redraw interval while size jobs are outstanding.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }
}
