// Provider implementations for search backends
pub mod openlibrary;

pub use openlibrary::OpenLibraryProvider;
