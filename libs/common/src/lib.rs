//! Common library for the BingePal services
//!
//! This crate provides the PostgreSQL plumbing shared by the services:
//! connection pooling, schema bootstrap and the associated error types.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, ensure_schema, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     ensure_schema(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
