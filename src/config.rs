//! Configuration for filebeam.
//!
//! Settings are read from `filebeam.toml` (see [load::Config::default_path]) into a [RawConfig]
//! and converted into the [Config] used at runtime. Every section and field is optional.

pub mod display;
pub mod general;
pub mod input;
pub mod load;
pub mod log;

pub use display::Display;
pub use general::{General, InternalGeneral};
pub use input::{Keys, Opener};
pub use load::{Config, ConfigError, RawConfig};
pub use log::LogConfig;
