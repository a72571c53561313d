//! CLI module

mod commands;
mod progress;

pub use commands::{Cli, Commands, mib, parse_file_types};
pub use progress::ProgressReporter;
