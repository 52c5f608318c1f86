//! Common library for the seafood storefront
//!
//! This crate provides shared functionality used across the workspace:
//! database connectivity, database error types and the primary-then-fallback
//! fetch helper used by catalog reads.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config)?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod fallback;

pub use fallback::{DataSource, Fetched, MaybeEmpty, with_fallback};
