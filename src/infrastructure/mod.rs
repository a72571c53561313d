//! Infrastructure layer
//!
//! Concrete implementations of the domain repositories.
//! This layer contains all file system and memory-mapping code.

pub mod disk_image;
pub mod persistence;
