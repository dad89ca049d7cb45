use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const OPEN_LIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// Page size attached to every search request
pub const RESULT_LIMIT: u32 = 20;

/// Field projection attached to every search request
pub const RESULT_FIELDS: &str =
    "key,title,author_name,first_publish_year,cover_i,subject,isbn,publisher,language";

#[derive(Error, Debug)]
pub enum OpenLibraryError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Search failed: {0}")]
    RequestFailed(reqwest::StatusCode),

    #[error("Invalid response format from Open Library")]
    InvalidResponse,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpenLibraryError>;

/// Which catalog field the query text is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Title,
    Author,
    Subject,
    Isbn,
    /// Generic full-text search
    All,
}

impl SearchField {
    /// Lenient lookup: anything unrecognized becomes a full-text search
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "title" => SearchField::Title,
            "author" => SearchField::Author,
            "subject" => SearchField::Subject,
            "isbn" => SearchField::Isbn,
            _ => SearchField::All,
        }
    }

    /// Query-string parameter the text is sent under
    pub fn param_name(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Subject => "subject",
            SearchField::Isbn => "isbn",
            SearchField::All => "q",
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchField::All => write!(f, "all"),
            other => write!(f, "{}", other.param_name()),
        }
    }
}

/// Everything needed to build one search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub text: String,
    pub field: SearchField,
    pub language: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl SearchParams {
    pub fn new(text: impl Into<String>, field: SearchField) -> Self {
        Self {
            text: text.into(),
            field,
            ..Default::default()
        }
    }

    /// Inclusive `first_publish_year` range in the catalog's bracket syntax
    pub fn year_range(&self) -> Option<String> {
        match (self.year_from, self.year_to) {
            (Some(from), Some(to)) => Some(format!("[{} TO {}]", from, to)),
            (Some(from), None) => Some(format!("[{} TO *]", from)),
            (None, Some(to)) => Some(format!("[* TO {}]", to)),
            (None, None) => None,
        }
    }

    /// Ordered query-string pairs for this request
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(self.field.param_name(), self.text.clone())];

        if let Some(language) = self.language.as_deref().filter(|l| !l.trim().is_empty()) {
            pairs.push(("language", language.trim().to_string()));
        }

        if let Some(range) = self.year_range() {
            pairs.push(("first_publish_year", range));
        }

        pairs.push(("fields", RESULT_FIELDS.to_string()));
        pairs.push(("limit", RESULT_LIMIT.to_string()));
        pairs
    }
}

/// One result document as returned by the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    /// Empty when the catalog omitted it; such docs are dropped on parse
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub subject: Option<Vec<String>>,
    #[serde(default)]
    pub isbn: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    docs: Option<Vec<SearchDoc>>,
    #[serde(rename = "numFound")]
    num_found: Option<u64>,
}

/// Parsed search response
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub docs: Vec<SearchDoc>,
    /// Total matches the catalog reports, not just this page
    pub num_found: u64,
}

impl SearchResponse {
    /// Parse a response body. A missing `numFound` (or zero) falls back to the page length.
    pub fn from_body(body: &str) -> Result<Self> {
        let raw: RawSearchResponse = serde_json::from_str(body)?;
        let mut docs = raw.docs.ok_or(OpenLibraryError::InvalidResponse)?;

        let before = docs.len();
        docs.retain(|doc| !doc.key.trim().is_empty());
        if docs.len() != before {
            warn!("Skipped {} result(s) without a key", before - docs.len());
        }

        let num_found = match raw.num_found {
            Some(n) if n > 0 => n,
            _ => docs.len() as u64,
        };

        Ok(Self { docs, num_found })
    }
}

pub struct OpenLibraryClient {
    client: reqwest::Client,
    search_url: String,
}

impl OpenLibraryClient {
    pub fn new() -> Result<Self> {
        Self::with_search_url(OPEN_LIBRARY_SEARCH_URL.to_string(), None)
    }

    /// Point at a different search endpoint (mirrors, local test servers)
    pub fn with_search_url(search_url: String, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }

        Ok(Self {
            client: builder.build()?,
            search_url,
        })
    }

    /// Build the GET request without sending it
    pub fn build_request(&self, params: &SearchParams) -> Result<reqwest::Request> {
        let request = self
            .client
            .get(&self.search_url)
            .query(&params.query_pairs())
            .build()?;
        Ok(request)
    }

    /// Run a single search. One request, no retries, no follow-up pages.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        if params.text.trim().is_empty() {
            return Err(OpenLibraryError::EmptyQuery);
        }

        let request = self.build_request(params)?;
        debug!("GET {}", request.url());

        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenLibraryError::RequestFailed(status));
        }

        let body = response.text().await?;
        SearchResponse::from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pairs_of(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_title_search_params() {
        let client = OpenLibraryClient::new().unwrap();
        let request = client
            .build_request(&SearchParams::new("dune", SearchField::Title))
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().path(), "/search.json");
        assert_eq!(
            pairs_of(&request),
            vec![
                ("title".to_string(), "dune".to_string()),
                ("fields".to_string(), RESULT_FIELDS.to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_field_selection() {
        for (field, name) in [
            (SearchField::Title, "title"),
            (SearchField::Author, "author"),
            (SearchField::Subject, "subject"),
            (SearchField::Isbn, "isbn"),
            (SearchField::All, "q"),
        ] {
            let pairs = SearchParams::new("x", field).query_pairs();
            assert_eq!(pairs[0], (name, "x".to_string()));
        }
    }

    #[test]
    fn test_unknown_field_name_falls_back_to_full_text() {
        assert_eq!(SearchField::from_name("publisher"), SearchField::All);
        assert_eq!(SearchField::from_name(""), SearchField::All);
        assert_eq!(SearchField::from_name("Author"), SearchField::Author);
        assert_eq!(SearchField::from_name("publisher").param_name(), "q");
    }

    #[test]
    fn test_year_range_brackets() {
        let mut params = SearchParams::new("x", SearchField::Author);
        assert_eq!(params.year_range(), None);

        params.year_from = Some(1990);
        params.year_to = Some(2000);
        assert_eq!(params.year_range().as_deref(), Some("[1990 TO 2000]"));

        params.year_to = None;
        assert_eq!(params.year_range().as_deref(), Some("[1990 TO *]"));

        params.year_from = None;
        params.year_to = Some(2000);
        assert_eq!(params.year_range().as_deref(), Some("[* TO 2000]"));
    }

    #[test]
    fn test_filters_are_encoded_in_order() {
        let client = OpenLibraryClient::new().unwrap();
        let params = SearchParams {
            text: "foundation".to_string(),
            field: SearchField::Subject,
            language: Some("eng".to_string()),
            year_from: Some(1990),
            year_to: None,
        };
        let request = client.build_request(&params).unwrap();
        let pairs = pairs_of(&request);

        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["subject", "language", "first_publish_year", "fields", "limit"]
        );

        let map: HashMap<_, _> = pairs.into_iter().collect();
        assert_eq!(map["language"], "eng");
        assert_eq!(map["first_publish_year"], "[1990 TO *]");
    }

    #[test]
    fn test_blank_language_is_ignored() {
        let mut params = SearchParams::new("x", SearchField::Title);
        params.language = Some("  ".to_string());
        assert!(params.query_pairs().iter().all(|(k, _)| *k != "language"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"docs":[{"key":"/works/OL1W","title":"Dune"}],"numFound":1}"#;
        let response = SearchResponse::from_body(body).unwrap();

        assert_eq!(response.num_found, 1);
        assert_eq!(response.docs.len(), 1);
        assert_eq!(response.docs[0].key, "/works/OL1W");
        assert_eq!(response.docs[0].title.as_deref(), Some("Dune"));
        assert_eq!(response.docs[0].author_name, None);
    }

    #[test]
    fn test_num_found_falls_back_to_page_length() {
        let body = r#"{"docs":[{"key":"/works/A"},{"key":"/works/B"}]}"#;
        assert_eq!(SearchResponse::from_body(body).unwrap().num_found, 2);

        let body = r#"{"docs":[{"key":"/works/A"}],"numFound":0}"#;
        assert_eq!(SearchResponse::from_body(body).unwrap().num_found, 1);
    }

    #[test]
    fn test_docs_without_key_are_skipped() {
        let body = r#"{"docs":[{"title":"No key"},{"key":"/works/A"},{"key":""}],"numFound":3}"#;
        let response = SearchResponse::from_body(body).unwrap();

        assert_eq!(response.docs.len(), 1);
        assert_eq!(response.docs[0].key, "/works/A");
        assert_eq!(response.num_found, 3);

        let body = r#"{"docs":[{"title":"No key"}]}"#;
        let response = SearchResponse::from_body(body).unwrap();
        assert!(response.docs.is_empty());
        assert_eq!(response.num_found, 0);
    }

    #[test]
    fn test_missing_docs_is_invalid_response() {
        let err = SearchResponse::from_body(r#"{"numFound":3}"#).unwrap_err();
        assert!(matches!(err, OpenLibraryError::InvalidResponse));
        assert_eq!(err.to_string(), "Invalid response format from Open Library");
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let err = SearchResponse::from_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, OpenLibraryError::ParseError(_)));
    }

    #[test]
    fn test_status_error_message() {
        let err = OpenLibraryError::RequestFailed(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Search failed: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        // Unroutable endpoint: reaching the network would fail with NetworkError instead
        let client =
            OpenLibraryClient::with_search_url("http://127.0.0.1:9/search.json".into(), None)
                .unwrap();
        let err = client
            .search(&SearchParams::new("   ", SearchField::Title))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenLibraryError::EmptyQuery));
    }
}
