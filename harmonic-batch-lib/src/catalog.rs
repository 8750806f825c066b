//! Operation catalog.
//!
//! This module provides `HarmonicBatch`, the entry point of the crate. It
//! wraps an existing `EnrichmentClient`: single calls are forwarded as-is,
//! list-shaped calls are fanned out over the `BatchEngine`.

use crate::client::EnrichmentClient;
use crate::concurrent::BatchEngine;
use crate::error::HarmonicError;
use crate::operation::Operation;
use crate::types::{
    BatchConfig, EnrichmentRequest, IdKind, Record, RecordProcessor, SearchArgs, SearchQuery,
    WatchlistUpdate,
};
use std::sync::Arc;
use tracing::warn;

/// Concurrent front-end for a Harmonic enrichment client.
///
/// `HarmonicBatch` handles:
/// - Forwarding single calls to the wrapped client untouched
/// - Running list-shaped calls on a bounded worker pool
/// - Returning batch results in input order
///
/// The client is shared by every worker and must be safe to call
/// concurrently. Clones share both the client and the worker pool.
///
/// # Example
///
/// ```rust,no_run
/// use harmonic_batch_lib::{EnrichmentClient, HarmonicBatch};
/// use std::sync::Arc;
///
/// async fn enrich(client: Arc<dyn EnrichmentClient>) -> harmonic_batch_lib::Result<()> {
///     let harmonic = HarmonicBatch::new(client);
///     let companies = harmonic
///         .enrich_companies(vec!["https://harmonic.ai", "https://example.com"])
///         .await?;
///     println!("enriched {} companies", companies.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HarmonicBatch {
    /// The wrapped single-request client
    client: Arc<dyn EnrichmentClient>,
    /// Worker pool for batched calls
    engine: BatchEngine,
    /// Configuration settings for this instance
    config: BatchConfig,
}

impl HarmonicBatch {
    /// Wrap a client with the default configuration (10 workers).
    pub fn new(client: Arc<dyn EnrichmentClient>) -> Self {
        Self::with_config(client, BatchConfig::default())
    }

    /// Wrap a client with a custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use harmonic_batch_lib::{BatchConfig, EnrichmentClient, HarmonicBatch};
    /// use std::sync::Arc;
    ///
    /// fn build(client: Arc<dyn EnrichmentClient>) -> HarmonicBatch {
    ///     let config = BatchConfig::default().with_workers(25);
    ///     HarmonicBatch::with_config(client, config)
    /// }
    /// ```
    pub fn with_config(client: Arc<dyn EnrichmentClient>, config: BatchConfig) -> Self {
        let engine = BatchEngine::with_config(&config);
        Self {
            client,
            engine,
            config,
        }
    }

    /// The wrapped client.
    pub fn client(&self) -> &Arc<dyn EnrichmentClient> {
        &self.client
    }

    /// The worker pool used for batched calls.
    pub fn engine(&self) -> &BatchEngine {
        &self.engine
    }

    /// Get the current configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Enrichment
    // ---------------------------------------------------------------

    pub async fn enrich_company(
        &self,
        request: impl Into<EnrichmentRequest>,
    ) -> Result<Record, HarmonicError> {
        self.client.enrich_company(&request.into()).await
    }

    /// Enrich many companies concurrently.
    ///
    /// # Arguments
    ///
    /// * `requests` - URLs or enrichment requests, one per company
    ///
    /// # Returns
    ///
    /// One record per request, in the same order.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single enrichment fails.
    pub async fn enrich_companies<I>(&self, requests: I) -> Result<Vec<Record>, HarmonicError>
    where
        I: IntoIterator,
        I::Item: Into<EnrichmentRequest>,
    {
        let requests: Vec<EnrichmentRequest> = requests.into_iter().map(Into::into).collect();
        let client = Arc::clone(&self.client);
        self.engine
            .map(requests, move |request| {
                let client = Arc::clone(&client);
                async move { client.enrich_company(&request).await }
            })
            .await
    }

    pub async fn enrich_person(&self, url: &str) -> Result<Record, HarmonicError> {
        self.client.enrich_person(url).await
    }

    /// Enrich many people concurrently, one profile URL each.
    ///
    /// Results come back in input order; any failure fails the batch.
    pub async fn enrich_people<I>(&self, urls: I) -> Result<Vec<Record>, HarmonicError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        let client = Arc::clone(&self.client);
        self.engine
            .map(urls, move |url| {
                let client = Arc::clone(&client);
                async move { client.enrich_person(&url).await }
            })
            .await
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub async fn get_company_by_id(&self, id: &str) -> Result<Record, HarmonicError> {
        self.client.get_company_by_id(id).await
    }

    pub async fn get_companies_by_ids(
        &self,
        ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.client.get_companies_by_ids(ids, kind).await
    }

    pub async fn get_person_by_id(&self, id: &str) -> Result<Record, HarmonicError> {
        self.client.get_person_by_id(id).await
    }

    pub async fn get_persons_by_ids(
        &self,
        ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.client.get_persons_by_ids(ids, kind).await
    }

    /// Look up a company by URN, returning `None` if the lookup store
    /// doesn't know it.
    ///
    /// Harmonic's search index and its lookup store are not in sync: some
    /// URNs returned by a search 404 when fetched. Only that not-found
    /// case is absorbed here; network failures and other API errors still
    /// propagate.
    pub async fn safe_get_company_by_urn(
        &self,
        urn: &str,
    ) -> Result<Option<Record>, HarmonicError> {
        lookup_company_or_absent(self.client.as_ref(), urn).await
    }

    /// Run `safe_get_company_by_urn` for many URNs concurrently.
    ///
    /// Returns one slot per URN: `Some(record)` when found, `None` when the
    /// lookup store doesn't know the URN. Not-found lookups never fail the
    /// batch; any other failure does.
    pub async fn batch_safe_get_company_by_urn<I>(
        &self,
        urns: I,
    ) -> Result<Vec<Option<Record>>, HarmonicError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let urns: Vec<String> = urns.into_iter().map(Into::into).collect();
        let client = Arc::clone(&self.client);
        self.engine
            .map(urns, move |urn| {
                let client = Arc::clone(&client);
                async move { lookup_company_or_absent(client.as_ref(), &urn).await }
            })
            .await
    }

    // ---------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------

    pub async fn search(&self, args: &SearchArgs) -> Result<Record, HarmonicError> {
        self.client.search(args).await
    }

    /// Search the first page using the configured default page size.
    pub async fn search_keywords(
        &self,
        query: impl Into<SearchQuery>,
    ) -> Result<Record, HarmonicError> {
        let args = SearchArgs::new(query).with_page_size(self.config.search_page_size);
        self.client.search(&args).await
    }

    /// Run many searches concurrently, one result page per argument set.
    pub async fn batch_searches(
        &self,
        searches: Vec<SearchArgs>,
    ) -> Result<Vec<Record>, HarmonicError> {
        let client = Arc::clone(&self.client);
        self.engine
            .map(searches, move |args| {
                let client = Arc::clone(&client);
                async move { client.search(&args).await }
            })
            .await
    }

    // ---------------------------------------------------------------
    // Saved searches
    // ---------------------------------------------------------------

    pub async fn get_saved_searches(&self) -> Result<Record, HarmonicError> {
        self.client.get_saved_searches().await
    }

    pub async fn get_saved_searches_by_owner(&self) -> Result<Record, HarmonicError> {
        self.client.get_saved_searches_by_owner().await
    }

    /// Fetch the results of a saved search.
    ///
    /// Not parallelised: the client pages through the results itself.
    /// `page_size` falls back to the configured default (100) when `None`.
    pub async fn get_saved_search_results(
        &self,
        saved_search_id: &str,
        processor: Option<RecordProcessor>,
        page_size: Option<u32>,
    ) -> Result<Record, HarmonicError> {
        let page_size = page_size.unwrap_or(self.config.saved_search_page_size);
        self.client
            .get_saved_search_results(saved_search_id, processor, page_size)
            .await
    }

    // ---------------------------------------------------------------
    // Watchlists
    // ---------------------------------------------------------------

    pub async fn get_watchlists(&self) -> Result<Record, HarmonicError> {
        self.client.get_watchlists().await
    }

    pub async fn get_watchlist_by_id(&self, watchlist_id: &str) -> Result<Record, HarmonicError> {
        self.client.get_watchlist_by_id(watchlist_id).await
    }

    pub async fn set_watchlist(
        &self,
        watchlist_id: &str,
        update: &WatchlistUpdate,
    ) -> Result<Record, HarmonicError> {
        self.client.set_watchlist(watchlist_id, update).await
    }

    pub async fn delete_watchlist(&self, watchlist_id: &str) -> Result<Record, HarmonicError> {
        self.client.delete_watchlist(watchlist_id).await
    }

    pub async fn add_company_to_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.client
            .add_company_to_watchlist(watchlist_id, company_ids, kind)
            .await
    }

    pub async fn add_company_to_watchlist_by_urls(
        &self,
        watchlist_id: &str,
        company_urls: &[String],
    ) -> Result<Record, HarmonicError> {
        self.client
            .add_company_to_watchlist_by_urls(watchlist_id, company_urls)
            .await
    }

    pub async fn remove_company_from_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.client
            .remove_company_from_watchlist(watchlist_id, company_ids, kind)
            .await
    }

    // ---------------------------------------------------------------
    // Mixed batches
    // ---------------------------------------------------------------

    /// Run a heterogeneous batch of operations concurrently.
    ///
    /// Each slot holds `Some(record)`, except `SafeGetCompanyByUrn` slots
    /// for unknown URNs, which hold `None`.
    pub async fn run_operations(
        &self,
        operations: Vec<Operation>,
    ) -> Result<Vec<Option<Record>>, HarmonicError> {
        let client = Arc::clone(&self.client);
        self.engine
            .map(operations, move |operation| operation.execute(Arc::clone(&client)))
            .await
    }
}

impl std::fmt::Debug for HarmonicBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicBatch")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Company lookup that turns a not-found failure into `None`.
pub(crate) async fn lookup_company_or_absent(
    client: &dyn EnrichmentClient,
    urn: &str,
) -> Result<Option<Record>, HarmonicError> {
    match client.get_company_by_id(urn).await {
        Ok(record) => Ok(Some(record)),
        Err(err) if err.is_not_found() => {
            warn!(urn, error = %err, "company not in lookup store, returning no record");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
