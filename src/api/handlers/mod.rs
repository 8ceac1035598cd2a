//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod simulate;
pub mod slugs;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use simulate::simulate_handler;
pub use slugs::create_slug_handler;
