//! Seafood storefront backend
//!
//! Public catalog reads fall back to built-in data when the database is
//! unavailable; the admin panel manages the catalog, branches, offers,
//! slideshow and users behind bearer tokens.

pub mod config;
pub mod error;
pub mod fallback_data;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod slug;
pub mod state;
pub mod upload;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
