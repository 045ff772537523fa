//! Repositories for database operations

pub mod activity;

pub use activity::{RatingRepository, SearchLogRepository};
