//! Repository traits (interfaces)
//!
//! These traits define the contracts for external dependencies.
//! They follow the Dependency Inversion Principle (DIP) from SOLID.

mod disk_image;
mod file_writer;

pub use disk_image::{DiskImageError, DiskImageSource};
pub use file_writer::{CarvedFileWriter, FileWriterError, WriteResult};
