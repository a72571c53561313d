//! Domain services
//!
//! Core business logic services that operate on domain entities.

mod carve_engine;
pub mod pattern_scanner;
pub mod placement;
mod signature_registry;

pub use carve_engine::{CarveEngine, CarveSession, DEFAULT_MAX_FILE_SIZE};
pub use pattern_scanner::{PatternId, PatternScanner, find_next};
pub use placement::{Occupancy, PlacementError, place_with_retry, retry_with_budget};
pub use signature_registry::SignatureRegistry;
