//! Domain layer - Core business logic
//!
//! This module contains the core domain entities, repository traits,
//! and domain services. It performs no I/O of its own.

pub mod entities;
pub mod repositories;
pub mod services;
