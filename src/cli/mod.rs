//! Command-line interface module
//!
//! Provides flag-block parsing and the process entry points.

pub mod args;
pub mod exec;

pub use args::{FlagArgs, parse_flag_block};
pub use exec::{run, run_with};
