//! Core domain entities.
//!
//! - [`ShortLink`] - a stored short code to original URL mapping
//! - [`NewShortLink`] - input for inserting a new mapping

pub mod link;

pub use link::{NewShortLink, ShortLink};
