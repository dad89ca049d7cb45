use bookfinder_api::SearchDoc;
use serde::{Deserialize, Serialize};

pub use bookfinder_api::SearchField;

/// One catalog entry, normalized
///
/// Serialized with the catalog's own field names so persisted favorites stay
/// readable by anything that speaks the search API's document shape.
/// Identity is the `key` alone: two records with the same key are the same
/// book no matter what else differs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookRecord {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "author_name", default, skip_serializing_if = "Option::is_none")]
    pub author_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(rename = "cover_i", default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(rename = "subject", default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(rename = "isbn", default, skip_serializing_if = "Option::is_none")]
    pub isbns: Option<Vec<String>>,
    #[serde(rename = "publisher", default, skip_serializing_if = "Option::is_none")]
    pub publishers: Option<Vec<String>>,
    #[serde(rename = "language", default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

impl PartialEq for BookRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BookRecord {}

impl std::hash::Hash for BookRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl BookRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "Untitled",
        }
    }

    /// First `limit` authors joined with commas
    pub fn display_authors(&self, limit: usize) -> String {
        let authors = non_empty(&self.author_names);
        if authors.is_empty() {
            return "Unknown Author".to_string();
        }
        authors
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn display_year(&self) -> String {
        self.first_publish_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Year Unknown".to_string())
    }

    pub fn authors(&self) -> &[String] {
        non_empty(&self.author_names)
    }

    pub fn subjects(&self) -> &[String] {
        non_empty(&self.subjects)
    }

    pub fn isbns(&self) -> &[String] {
        non_empty(&self.isbns)
    }

    pub fn publishers(&self) -> &[String] {
        non_empty(&self.publishers)
    }

    pub fn languages(&self) -> &[String] {
        non_empty(&self.languages)
    }

    pub fn first_isbn(&self) -> Option<&str> {
        self.isbns().first().map(String::as_str)
    }
}

// Absent and empty collections render the same way
fn non_empty(values: &Option<Vec<String>>) -> &[String] {
    values.as_deref().unwrap_or(&[])
}

impl From<SearchDoc> for BookRecord {
    fn from(doc: SearchDoc) -> Self {
        Self {
            key: doc.key,
            title: doc.title,
            author_names: doc.author_name,
            first_publish_year: doc.first_publish_year,
            cover_id: doc.cover_i,
            subjects: doc.subject,
            isbns: doc.isbn,
            publishers: doc.publisher,
            languages: doc.language,
        }
    }
}

/// Per-search filter set. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub field: SearchField,
    pub language: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl SearchFilters {
    pub fn by(field: SearchField) -> Self {
        Self {
            field,
            ..Default::default()
        }
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        let code = code.trim();
        self.language = if code.is_empty() { None } else { Some(code.to_string()) };
        self
    }

    pub fn years(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }
}

/// One page of normalized results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub records: Vec<BookRecord>,
    pub total_available: u64,
}
