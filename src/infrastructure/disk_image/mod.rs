//! Disk image implementations

mod builder;
mod memory_disk_image;
mod mmap_disk_image;

pub use builder::DiskImageBuilder;
pub use memory_disk_image::MemoryDiskImage;
pub use mmap_disk_image::MmapDiskImage;
