// Outbound URLs derived from a record. Built here, never fetched here.
use crate::config::ApiConfig;
use crate::models::BookRecord;

const WORLDCAT_ISBN_URL: &str = "https://www.worldcat.org/isbn";
const AMAZON_SEARCH_URL: &str = "https://www.amazon.com/s";

/// Cover image size token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    /// Result cards and list rows
    Medium,
    /// Detail view
    Large,
}

impl CoverSize {
    pub fn token(&self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Links {
    catalog_url: String,
    covers_url: String,
}

impl Links {
    pub fn new(catalog_url: impl Into<String>, covers_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into().trim_end_matches('/').to_string(),
            covers_url: covers_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.catalog_url, &config.covers_url)
    }

    pub fn cover_url(&self, book: &BookRecord, size: CoverSize) -> Option<String> {
        book.cover_id
            .map(|id| format!("{}/b/id/{}-{}.jpg", self.covers_url, id, size.token()))
    }

    /// Work page on the catalog itself; keys already start with a slash
    pub fn catalog_url(&self, book: &BookRecord) -> String {
        format!("{}{}", self.catalog_url, book.key)
    }

    pub fn worldcat_url(&self, book: &BookRecord) -> Option<String> {
        book.first_isbn()
            .map(|isbn| format!("{}/{}", WORLDCAT_ISBN_URL, urlencoding::encode(isbn)))
    }

    pub fn amazon_url(&self, book: &BookRecord) -> Option<String> {
        book.first_isbn()
            .map(|isbn| format!("{}?k={}", AMAZON_SEARCH_URL, urlencoding::encode(isbn)))
    }
}

impl Default for Links {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}
