// API client for the Open Library search service
pub mod openlibrary;

// Re-export common types
pub use openlibrary::{
    OpenLibraryClient, OpenLibraryError, SearchDoc, SearchField, SearchParams, SearchResponse,
    RESULT_FIELDS, RESULT_LIMIT,
};
