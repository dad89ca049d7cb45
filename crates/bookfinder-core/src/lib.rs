// BookFinder data layer: search execution, the favorites list, and the
// URLs and exports built from book records
pub mod config;
pub mod error;
pub mod export;
pub mod favorites;
pub mod links;
pub mod models;
pub mod providers;
pub mod search;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use favorites::{FavoritesStorage, FavoritesStore, MemoryStorage, SlotStorage, FAVORITES_SLOT};
pub use links::{CoverSize, Links};
pub use models::{BookRecord, SearchField, SearchFilters, SearchPage};
pub use providers::OpenLibraryProvider;
pub use search::{SearchProvider, SearchSession, SearchState};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
