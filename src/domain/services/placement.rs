//! Non-overlapping placement with a bounded retry budget
//!
//! Used when building synthetic disk images: each payload gets a random
//! offset, conflicting offsets are redrawn, and the attempt budget turns an
//! unlucky layout into an error instead of an endless loop.

use rand::Rng;
use std::ops::Range;
use thiserror::Error;

/// Errors that can occur while placing a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("payload of {size} bytes does not fit in {capacity} bytes")]
    TooLarge { size: u64, capacity: u64 },

    #[error("no free slot for {size} bytes after {attempts} attempts")]
    BudgetExhausted { size: u64, attempts: u32 },
}

/// Runs `attempt` until it yields a value or `budget` attempts are spent
///
/// The closure receives the zero-based attempt number.
pub fn retry_with_budget<T, F>(budget: u32, mut attempt: F) -> Option<T>
where
    F: FnMut(u32) -> Option<T>,
{
    (0..budget).find_map(|n| attempt(n))
}

/// Set of occupied, pairwise disjoint ranges
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    ranges: Vec<Range<u64>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `range` intersects any occupied range
    pub fn overlaps(&self, range: &Range<u64>) -> bool {
        self.ranges
            .iter()
            .any(|r| range.start < r.end && r.start < range.end)
    }

    /// Marks `range` as occupied; returns `false` if it conflicts
    pub fn insert(&mut self, range: Range<u64>) -> bool {
        if self.overlaps(&range) {
            return false;
        }
        let at = self.ranges.partition_point(|r| r.start < range.start);
        self.ranges.insert(at, range);
        true
    }

    /// Occupied ranges sorted by start offset
    pub fn ranges(&self) -> &[Range<u64>] {
        &self.ranges
    }

    /// Unoccupied ranges inside `0..capacity`, in ascending order
    pub fn gaps(&self, capacity: u64) -> Vec<Range<u64>> {
        let mut gaps = Vec::with_capacity(self.ranges.len() + 1);
        let mut pos = 0;
        for r in &self.ranges {
            if r.start > pos {
                gaps.push(pos..r.start);
            }
            pos = pos.max(r.end);
        }
        if pos < capacity {
            gaps.push(pos..capacity);
        }
        gaps
    }

    /// Total occupied bytes
    pub fn occupied_bytes(&self) -> u64 {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }
}

/// Picks a random free offset for `size` bytes inside `0..capacity`
///
/// The chosen range is recorded in `occupancy`.
pub fn place_with_retry<R: Rng + ?Sized>(
    occupancy: &mut Occupancy,
    capacity: u64,
    size: u64,
    max_attempts: u32,
    rng: &mut R,
) -> Result<u64, PlacementError> {
    if size > capacity {
        return Err(PlacementError::TooLarge { size, capacity });
    }

    let offset = retry_with_budget(max_attempts, |_| {
        let start = rng.gen_range(0..=capacity - size);
        occupancy.insert(start..start + size).then_some(start)
    });

    offset.ok_or(PlacementError::BudgetExhausted {
        size,
        attempts: max_attempts,
    })
}
