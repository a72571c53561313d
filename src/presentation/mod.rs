//! Presentation layer
//!
//! Command-line interface and terminal progress.

pub mod cli;
