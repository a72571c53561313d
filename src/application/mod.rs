//! Application layer
//!
//! Use cases that orchestrate domain logic over the file system.

mod carve_image;
pub mod dto;
mod generate_disk;
mod validate_recovery;

pub use carve_image::CarveImageUseCase;
pub use generate_disk::{GenerateDiskUseCase, SourceImage, collect_source_images};
pub use validate_recovery::ValidateRecoveryUseCase;
