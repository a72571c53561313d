//! Synthetic disk image construction
//!
//! The buffer is only mutable while the builder owns it. `finish` freezes it
//! into a [`MemoryDiskImage`], after which nothing can write to it.

use super::MemoryDiskImage;
use crate::domain::services::{Occupancy, PlacementError, place_with_retry};
use rand::Rng;
use std::ops::Range;
use std::path::PathBuf;

/// Builds a zero-filled buffer, injects payloads, fills the rest with noise
#[derive(Debug)]
pub struct DiskImageBuilder {
    buffer: Vec<u8>,
    occupancy: Occupancy,
}

impl DiskImageBuilder {
    /// Creates a zero-filled buffer of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0u8; size],
            occupancy: Occupancy::new(),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Copies `payload` to a random offset that overlaps nothing placed so far
    pub fn inject<R: Rng + ?Sized>(
        &mut self,
        payload: &[u8],
        max_attempts: u32,
        rng: &mut R,
    ) -> Result<u64, PlacementError> {
        let size = payload.len() as u64;
        let capacity = self.capacity();
        let offset = place_with_retry(&mut self.occupancy, capacity, size, max_attempts, rng)?;
        let start = offset as usize;
        self.buffer[start..start + payload.len()].copy_from_slice(payload);
        Ok(offset)
    }

    /// Overwrites every unoccupied byte with random noise
    pub fn fill_noise<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for Range { start, end } in self.occupancy.gaps(self.capacity()) {
            rng.fill(&mut self.buffer[start as usize..end as usize]);
        }
    }

    /// Ranges holding injected payloads
    pub fn occupied(&self) -> &[Range<u64>] {
        self.occupancy.ranges()
    }

    /// Bytes covered by injected payloads
    pub fn injected_bytes(&self) -> u64 {
        self.occupancy.occupied_bytes()
    }

    /// Freezes the buffer
    pub fn finish(self, path: impl Into<PathBuf>) -> MemoryDiskImage {
        MemoryDiskImage::from_bytes(path, self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::DiskImageSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn injected_payloads_survive_noise_fill() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut builder = DiskImageBuilder::new(4096);
        let payload = vec![0xAB; 100];

        let offset = builder.inject(&payload, 100, &mut rng).unwrap() as usize;
        builder.fill_noise(&mut rng);
        let image = builder.finish("synthetic.img");

        assert_eq!(&image.as_bytes()[offset..offset + 100], payload.as_slice());
        assert_eq!(image.size(), 4096);
    }

    #[test]
    fn payload_larger_than_disk_is_refused() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut builder = DiskImageBuilder::new(16);
        let result = builder.inject(&[0u8; 17], 100, &mut rng);
        assert!(matches!(result, Err(PlacementError::TooLarge { .. })));
        assert_eq!(builder.injected_bytes(), 0);
    }

    #[test]
    fn noise_replaces_the_zero_fill() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut builder = DiskImageBuilder::new(1 << 16);
        builder.fill_noise(&mut rng);
        let image = builder.finish("noise.img");
        let zeros = image.as_bytes().iter().filter(|&&b| b == 0).count();
        assert!(zeros < 1024);
    }
}
