// Open Library provider - bridges the API client with the SearchProvider trait
use async_trait::async_trait;
use bookfinder_api::{OpenLibraryClient, SearchParams};

use crate::{
    config::ApiConfig,
    models::{BookRecord, SearchFilters, SearchPage},
    search::SearchProvider,
    Result,
};

/// Wrapper around OpenLibraryClient that implements SearchProvider
pub struct OpenLibraryProvider {
    client: OpenLibraryClient,
}

impl OpenLibraryProvider {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client =
            OpenLibraryClient::with_search_url(config.search_url.clone(), Some(&config.user_agent))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for OpenLibraryProvider {
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<SearchPage> {
        let response = self.client.search(&to_params(query, filters)).await?;

        Ok(SearchPage {
            records: response.docs.into_iter().map(BookRecord::from).collect(),
            total_available: response.num_found,
        })
    }
}

/// Translate the domain filter set into wire parameters
pub(crate) fn to_params(query: &str, filters: &SearchFilters) -> SearchParams {
    SearchParams {
        text: query.to_string(),
        field: filters.field,
        language: filters.language.clone(),
        year_from: filters.year_from,
        year_to: filters.year_to,
    }
}
