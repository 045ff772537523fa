//! Media catalog aggregation for BingePal
//!
//! Five upstream catalogs (TMDb, AniList with Jikan, RAWG, Open Library and
//! MangaDex) are reshaped into one canonical record model. The [`Dispatcher`]
//! routes a caller-declared media type to the adapter serving it.
//!
//! ```rust,no_run
//! use catalog::{CatalogConfig, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::new(&CatalogConfig::from_env())?;
//!     for record in dispatcher.search("anime", "cowboy bebop").await? {
//!         println!("{} ({:?})", record.title, record.year);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod model;
pub mod provider;
pub mod providers;

pub use config::CatalogConfig;
pub use dispatch::Dispatcher;
pub use error::{CatalogError, CatalogResult};
pub use model::{CatalogSource, EpisodeOrChapter, MediaSummary, MediaType};
pub use provider::{EpisodeSource, MAX_SEARCH_RESULTS, MediaCatalog};
