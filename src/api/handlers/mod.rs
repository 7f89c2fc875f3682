//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod redirect;

pub use health::health_handler;
pub use links::{
    cleanup_expired_handler, create_link_handler, link_details_handler, links_by_tags_handler,
};
pub use redirect::redirect_handler;
