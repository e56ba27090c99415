//! Miscellaneous utility functions for filebeam.
//!
//! - [helpers]: path display and expansion, unused path generation, recursive copy and
//!   running external programs.
//! - [cli]: command line argument handling.

pub mod cli;
pub mod helpers;

pub use helpers::{
    copy_recursive, expand_home_path, get_home, get_unused_path, open_with, program_exists,
    resolve_input_path, shorten_home_path,
};
