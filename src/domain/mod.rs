//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Business rules live in [`crate::application::services`].
//!
//! # Link Lifecycle
//!
//! 1. Created active by the shortening service
//! 2. Resolved (and access-stamped) by the resolve service while active and unexpired
//! 3. Deactivated once expired, either lazily on access or by the periodic sweep
//!
//! A deactivated link is never reactivated and its code is never reissued.

pub mod entities;
pub mod repositories;
