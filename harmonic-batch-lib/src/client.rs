//! The wrapped remote enrichment client.
//!
//! `EnrichmentClient` is the seam between this crate and whatever talks to
//! the Harmonic API. Implementations own transport, authentication and
//! retries; the batch layer only calls these methods and passes results
//! through. Every method may be called from several workers at once.

use crate::error::HarmonicError;
use crate::types::{
    EnrichmentRequest, IdKind, Record, RecordProcessor, SearchArgs, WatchlistUpdate,
};
use async_trait::async_trait;

/// Single-request client for the Harmonic enrichment API.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    /// Enrich a company from a URL or an enrichment request.
    async fn enrich_company(&self, request: &EnrichmentRequest) -> Result<Record, HarmonicError>;

    /// Enrich a person from a profile URL.
    async fn enrich_person(&self, url: &str) -> Result<Record, HarmonicError>;

    async fn get_company_by_id(&self, id: &str) -> Result<Record, HarmonicError>;

    async fn get_companies_by_ids(
        &self,
        ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError>;

    async fn get_person_by_id(&self, id: &str) -> Result<Record, HarmonicError>;

    async fn get_persons_by_ids(&self, ids: &[String], kind: IdKind)
        -> Result<Record, HarmonicError>;

    /// Run one page of a keyword or structured search.
    async fn search(&self, args: &SearchArgs) -> Result<Record, HarmonicError>;

    async fn get_saved_searches(&self) -> Result<Record, HarmonicError>;

    async fn get_saved_searches_by_owner(&self) -> Result<Record, HarmonicError>;

    /// Page through the results of a saved search.
    ///
    /// When a `processor` is given the client calls it once per record as
    /// pages arrive.
    async fn get_saved_search_results(
        &self,
        saved_search_id: &str,
        processor: Option<RecordProcessor>,
        page_size: u32,
    ) -> Result<Record, HarmonicError>;

    async fn get_watchlists(&self) -> Result<Record, HarmonicError>;

    async fn get_watchlist_by_id(&self, watchlist_id: &str) -> Result<Record, HarmonicError>;

    async fn set_watchlist(
        &self,
        watchlist_id: &str,
        update: &WatchlistUpdate,
    ) -> Result<Record, HarmonicError>;

    async fn delete_watchlist(&self, watchlist_id: &str) -> Result<Record, HarmonicError>;

    async fn add_company_to_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError>;

    async fn add_company_to_watchlist_by_urls(
        &self,
        watchlist_id: &str,
        company_urls: &[String],
    ) -> Result<Record, HarmonicError>;

    async fn remove_company_from_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError>;
}
