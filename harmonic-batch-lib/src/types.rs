//! Core data types for batch execution and the operation catalog.
//!
//! This module defines the argument records each catalog operation takes,
//! the opaque `Record` the remote client returns, and `BatchConfig`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Response body returned by the remote enrichment client.
///
/// The batch layer never parses responses; it hands back exactly what the
/// wrapped client produced.
pub type Record = serde_json::Value;

/// Callback invoked by the client for every record of a saved search.
pub type RecordProcessor = Arc<dyn Fn(&Record) + Send + Sync>;

/// Upper bound on the worker pool size.
pub const MAX_WORKERS: usize = 100;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 10;

/// Default page size for keyword searches.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 50;

/// Default page size when paging through saved search results.
pub const DEFAULT_SAVED_SEARCH_PAGE_SIZE: u32 = 100;

/// What to enrich: a public URL (website, LinkedIn, ...) or a full
/// enrichment request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnrichmentRequest {
    Url(String),
    Request(Record),
}

impl From<&str> for EnrichmentRequest {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl From<String> for EnrichmentRequest {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl fmt::Display for EnrichmentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentRequest::Url(url) => write!(f, "{}", url),
            EnrichmentRequest::Request(body) => write!(f, "{}", body),
        }
    }
}

/// Search input: free-text keywords or a structured query document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchQuery {
    Keywords(String),
    Query(Record),
}

impl From<&str> for SearchQuery {
    fn from(keywords: &str) -> Self {
        Self::Keywords(keywords.to_string())
    }
}

impl From<String> for SearchQuery {
    fn from(keywords: String) -> Self {
        Self::Keywords(keywords)
    }
}

/// Arguments of a single search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchArgs {
    /// Keywords or structured query
    pub query: SearchQuery,

    /// Zero-based page index
    /// Default: 0
    pub page: u32,

    /// Results per page
    /// Default: 50
    pub page_size: u32,

    /// Whether matching records are returned, or only their count
    /// Default: true
    pub include_results: bool,
}

impl SearchArgs {
    /// Create search arguments with the default paging.
    pub fn new<Q: Into<SearchQuery>>(query: Q) -> Self {
        Self {
            query: query.into(),
            page: 0,
            page_size: DEFAULT_SEARCH_PAGE_SIZE,
            include_results: true,
        }
    }

    /// Select the page to fetch.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Only return the result count when set to `false`.
    pub fn with_include_results(mut self, include_results: bool) -> Self {
        self.include_results = include_results;
        self
    }
}

/// How a list of identifiers should be interpreted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// Numeric Harmonic ids
    #[default]
    Id,
    /// Harmonic URNs (`urn:harmonic:company:...`)
    Urn,
}

impl IdKind {
    /// Whether identifiers are URNs.
    pub fn is_urn(self) -> bool {
        matches!(self, IdKind::Urn)
    }
}

/// Partial update of a watchlist. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Replacement list of company ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_with_team: Option<bool>,
}

impl WatchlistUpdate {
    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_companies(mut self, companies: Vec<String>) -> Self {
        self.companies = Some(companies);
        self
    }

    pub fn with_shared_with_team(mut self, shared: bool) -> Self {
        self.shared_with_team = Some(shared);
        self
    }
}

/// Configuration options for batch execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of work units running at the same time
    /// Default: 10, Range: 1-100
    pub workers: usize,

    /// Page size used by `search_keywords`
    /// Default: 50
    pub search_page_size: u32,

    /// Page size used by `saved_search_results`
    /// Default: 100
    pub saved_search_page_size: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
            saved_search_page_size: DEFAULT_SAVED_SEARCH_PAGE_SIZE,
        }
    }
}

impl BatchConfig {
    /// Set the worker count.
    ///
    /// Clamped to 1-100 so a batch can always make progress and a typo
    /// can't open thousands of connections.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Set the default search page size.
    pub fn with_search_page_size(mut self, page_size: u32) -> Self {
        self.search_page_size = page_size.max(1);
        self
    }

    /// Set the default saved search page size.
    pub fn with_saved_search_page_size(mut self, page_size: u32) -> Self {
        self.saved_search_page_size = page_size.max(1);
        self
    }
}
