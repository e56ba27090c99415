//! Internal library crate for filebeam.
//!
//! The shipped application is the `filebeam` binary (`src/main.rs`).
//!
//! The library exists to share code between the binary and the integration tests. It is not
//! considered a stable API for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
