//! # Harmonic Batch Library
//!
//! Concurrent, order-preserving batch execution over a Harmonic enrichment
//! client.
//!
//! The library wraps an already-built client (anything implementing
//! [`EnrichmentClient`]) and adds one capability: running many independent
//! requests at once on a bounded worker pool while returning results in the
//! order they were submitted. Transport, authentication and retries stay
//! with the wrapped client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use harmonic_batch_lib::{EnrichmentClient, HarmonicBatch};
//! use std::sync::Arc;
//!
//! async fn run(client: Arc<dyn EnrichmentClient>) -> harmonic_batch_lib::Result<()> {
//!     let harmonic = HarmonicBatch::new(client);
//!
//!     let urns = vec!["urn:harmonic:company:1", "urn:harmonic:company:2"];
//!     for company in harmonic.batch_safe_get_company_by_urn(urns).await? {
//!         match company {
//!             Some(record) => println!("{}", record),
//!             None => println!("not in lookup store"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Batch Engine**: bounded fan-out/fan-in with input-ordered results
//! - **Operation Catalog**: every client call, singly or batched
//! - **Typed Operations**: heterogeneous batches checked at compile time
//! - **Configurable**: worker count from code, TOML files or `HB_*` variables

// Re-export main public API types and functions
pub use catalog::HarmonicBatch;
pub use client::EnrichmentClient;
pub use concurrent::BatchEngine;
pub use config::{
    load_env_config, resolve_config, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::HarmonicError;
pub use operation::Operation;
pub use types::{
    BatchConfig, EnrichmentRequest, IdKind, Record, RecordProcessor, SearchArgs, SearchQuery,
    WatchlistUpdate, DEFAULT_SAVED_SEARCH_PAGE_SIZE, DEFAULT_SEARCH_PAGE_SIZE, DEFAULT_WORKERS,
    MAX_WORKERS,
};

// Internal modules - reachable through the re-exports above
mod catalog;
mod client;
mod concurrent;
mod config;
mod error;
mod operation;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, HarmonicError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
