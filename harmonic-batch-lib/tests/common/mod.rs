// harmonic-batch-lib/tests/common/mod.rs

//! In-memory `EnrichmentClient` used by the integration tests.
//!
//! Every call is recorded, can be delayed, and can be made to fail. Company
//! lookups resolve against a small in-memory store and return a not-found
//! error for anything else, like the real lookup endpoint.

#![allow(dead_code)]

use async_trait::async_trait;
use harmonic_batch_lib::{
    EnrichmentClient, EnrichmentRequest, HarmonicError, IdKind, Record, RecordProcessor,
    SearchArgs, WatchlistUpdate,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
pub struct MockClient {
    companies: HashMap<String, Record>,
    failures: HashMap<String, HarmonicError>,
    delays: HashMap<String, Duration>,
    saved_search_records: Vec<Record>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `get_company_by_id(id)` resolve to `record`.
    pub fn with_company(mut self, id: &str, record: Record) -> Self {
        self.companies.insert(id.to_string(), record);
        self
    }

    /// Make any call whose key argument is `key` fail with `error`.
    pub fn failing(mut self, key: &str, error: HarmonicError) -> Self {
        self.failures.insert(key.to_string(), error);
        self
    }

    /// Delay any call whose key argument is `key`.
    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    /// Records fed to a saved search processor.
    pub fn with_saved_search_records(mut self, records: Vec<Record>) -> Self {
        self.saved_search_records = records;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of calls that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn call(&self, operation: &str, key: &str, args: Record) -> Result<Record, HarmonicError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}({})", operation, key));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(key)
            .copied()
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failures.get(key) {
            return Err(error.clone());
        }
        Ok(json!({ "operation": operation, "args": args }))
    }
}

#[async_trait]
impl EnrichmentClient for MockClient {
    async fn enrich_company(&self, request: &EnrichmentRequest) -> Result<Record, HarmonicError> {
        let key = request.to_string();
        self.call("enrich_company", &key, json!(key)).await
    }

    async fn enrich_person(&self, url: &str) -> Result<Record, HarmonicError> {
        self.call("enrich_person", url, json!(url)).await
    }

    async fn get_company_by_id(&self, id: &str) -> Result<Record, HarmonicError> {
        self.call("get_company_by_id", id, json!(id)).await?;
        self.companies
            .get(id)
            .cloned()
            .ok_or_else(|| HarmonicError::not_found("company", id))
    }

    async fn get_companies_by_ids(
        &self,
        ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        let key = ids.join(",");
        self.call("get_companies_by_ids", &key, json!({ "ids": ids, "urn": kind.is_urn() }))
            .await
    }

    async fn get_person_by_id(&self, id: &str) -> Result<Record, HarmonicError> {
        self.call("get_person_by_id", id, json!(id)).await
    }

    async fn get_persons_by_ids(
        &self,
        ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        let key = ids.join(",");
        self.call("get_persons_by_ids", &key, json!({ "ids": ids, "urn": kind.is_urn() }))
            .await
    }

    async fn search(&self, args: &SearchArgs) -> Result<Record, HarmonicError> {
        let key = match &args.query {
            harmonic_batch_lib::SearchQuery::Keywords(keywords) => keywords.clone(),
            harmonic_batch_lib::SearchQuery::Query(query) => query.to_string(),
        };
        self.call("search", &key, serde_json::to_value(args)?).await
    }

    async fn get_saved_searches(&self) -> Result<Record, HarmonicError> {
        self.call("get_saved_searches", "", json!(null)).await
    }

    async fn get_saved_searches_by_owner(&self) -> Result<Record, HarmonicError> {
        self.call("get_saved_searches_by_owner", "", json!(null)).await
    }

    async fn get_saved_search_results(
        &self,
        saved_search_id: &str,
        processor: Option<RecordProcessor>,
        page_size: u32,
    ) -> Result<Record, HarmonicError> {
        let result = self
            .call(
                "get_saved_search_results",
                saved_search_id,
                json!({ "page_size": page_size }),
            )
            .await?;
        if let Some(processor) = processor {
            for record in &self.saved_search_records {
                processor(record);
            }
        }
        Ok(result)
    }

    async fn get_watchlists(&self) -> Result<Record, HarmonicError> {
        self.call("get_watchlists", "", json!(null)).await
    }

    async fn get_watchlist_by_id(&self, watchlist_id: &str) -> Result<Record, HarmonicError> {
        self.call("get_watchlist_by_id", watchlist_id, json!(watchlist_id))
            .await
    }

    async fn set_watchlist(
        &self,
        watchlist_id: &str,
        update: &WatchlistUpdate,
    ) -> Result<Record, HarmonicError> {
        self.call("set_watchlist", watchlist_id, serde_json::to_value(update)?)
            .await
    }

    async fn delete_watchlist(&self, watchlist_id: &str) -> Result<Record, HarmonicError> {
        self.call("delete_watchlist", watchlist_id, json!(watchlist_id))
            .await
    }

    async fn add_company_to_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.call(
            "add_company_to_watchlist",
            watchlist_id,
            json!({ "ids": company_ids, "urn": kind.is_urn() }),
        )
        .await
    }

    async fn add_company_to_watchlist_by_urls(
        &self,
        watchlist_id: &str,
        company_urls: &[String],
    ) -> Result<Record, HarmonicError> {
        self.call(
            "add_company_to_watchlist_by_urls",
            watchlist_id,
            json!({ "urls": company_urls }),
        )
        .await
    }

    async fn remove_company_from_watchlist(
        &self,
        watchlist_id: &str,
        company_ids: &[String],
        kind: IdKind,
    ) -> Result<Record, HarmonicError> {
        self.call(
            "remove_company_from_watchlist",
            watchlist_id,
            json!({ "ids": company_ids, "urn": kind.is_urn() }),
        )
        .await
    }
}
