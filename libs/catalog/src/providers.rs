//! Concrete adapters, one per upstream catalog

mod anilist;
mod mangadex;
mod openlibrary;
mod rawg;
mod tmdb;

pub use anilist::AniListAdapter;
pub use mangadex::MangaDexAdapter;
pub use openlibrary::OpenLibraryAdapter;
pub use rawg::RawgAdapter;
pub use tmdb::TmdbAdapter;
