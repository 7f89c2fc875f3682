//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait and
//! provide a clean API for HTTP handlers and the admin CLI. They never call each other;
//! all coordination happens through the store.
//!
//! # Available Services
//!
//! - [`services::ShortenService`] - Short link creation with reuse and collision retry
//! - [`services::ResolveService`] - Redirect resolution with lazy expiration
//! - [`services::LinkService`] - Details, tag queries and short URL projection
//! - [`services::SweepService`] - Bulk deactivation of expired links
//!
//! [`expiry_worker`] drives the sweep on a fixed schedule.

pub mod expiry_worker;
pub mod services;
