//! Utility functions used across the application:
//!
//! - [`code_generator`] - Random short code generation
//! - [`expiry`] - Expiration date parsing
//! - [`url_validator`] - Original URL validation

pub mod code_generator;
pub mod expiry;
pub mod url_validator;
