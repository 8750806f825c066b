//! Concurrent batch execution.
//!
//! This module provides `BatchEngine`, a bounded worker pool that runs a
//! batch of independent work units at the same time and hands the results
//! back in the order the units were submitted.

use crate::error::HarmonicError;
use crate::types::{BatchConfig, MAX_WORKERS};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Fan-out/fan-in executor with a fixed concurrency ceiling.
///
/// Every unit of a batch is spawned onto the tokio runtime immediately, but
/// only `workers` of them hold a permit at any one time; the rest wait in
/// the semaphore queue. The pool outlives individual batches and is shared
/// by clones of the engine.
///
/// # Example
///
/// ```rust
/// use harmonic_batch_lib::BatchEngine;
///
/// # #[tokio::main]
/// # async fn main() -> harmonic_batch_lib::Result<()> {
/// let engine = BatchEngine::new(2);
/// let doubled = engine
///     .map(vec![3, 4, 5], |x: i32| async move { Ok(x * 2) })
///     .await?;
/// assert_eq!(doubled, vec![6, 8, 10]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchEngine {
    /// One permit per worker
    permits: Arc<Semaphore>,
    /// Configured capacity
    workers: usize,
}

impl BatchEngine {
    /// Create an engine with `workers` concurrent slots (clamped to 1-100).
    pub fn new(workers: usize) -> Self {
        let workers = workers.clamp(1, MAX_WORKERS);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Create an engine sized from a `BatchConfig`.
    pub fn with_config(config: &BatchConfig) -> Self {
        Self::new(config.workers)
    }

    /// Maximum number of units that run at the same time.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of workers not currently running a unit.
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run a batch of work units and return their results in input order.
    ///
    /// The call only returns once every unit has finished, successfully or
    /// not. If any unit fails the whole batch fails and the successful
    /// results are dropped. When several units fail, the error of the
    /// lowest-index failing unit is returned; which one is reported is not
    /// part of the contract.
    ///
    /// A unit that panics is reported as `HarmonicError::Worker`.
    ///
    /// # Arguments
    ///
    /// * `units` - Futures to run; position in the iterator is the result index
    ///
    /// # Errors
    ///
    /// Returns the failure of one of the units.
    pub async fn run<T, I, Fut>(&self, units: I) -> Result<Vec<T>, HarmonicError>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = Result<T, HarmonicError>> + Send + 'static,
        T: Send + 'static,
    {
        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let permits = Arc::clone(&self.permits);
                tokio::spawn(async move {
                    // Held until the unit completes
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|_| HarmonicError::worker("worker pool is closed"))?;
                    unit.await
                })
            })
            .collect();

        if handles.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = handles.len();
        let started = Instant::now();
        debug!(batch_size, workers = self.workers, "running batch");

        // join_all keeps submission order, so outcomes[i] belongs to unit i
        let outcomes = join_all(handles).await;

        let mut results = Vec::with_capacity(batch_size);
        let mut first_failure: Option<(usize, HarmonicError)> = None;
        let mut failed = 0usize;

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome.map_err(HarmonicError::from).and_then(|result| result) {
                Ok(value) => results.push(value),
                Err(err) => {
                    failed += 1;
                    if first_failure.is_none() {
                        first_failure = Some((index, err));
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        match first_failure {
            Some((index, err)) => {
                warn!(
                    batch_size,
                    failed,
                    index,
                    error = %err,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "batch failed"
                );
                Err(err)
            }
            None => {
                debug!(
                    batch_size,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "batch complete"
                );
                Ok(results)
            }
        }
    }

    /// Apply one operation to every argument and run the units as a batch.
    ///
    /// This is the shape every batched catalog entry uses: the same call
    /// replicated once per input item.
    pub async fn map<A, T, F, Fut>(&self, args: Vec<A>, operation: F) -> Result<Vec<T>, HarmonicError>
    where
        F: FnMut(A) -> Fut,
        Fut: Future<Output = Result<T, HarmonicError>> + Send + 'static,
        T: Send + 'static,
    {
        let units: Vec<Fut> = args.into_iter().map(operation).collect();
        self.run(units).await
    }
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::with_config(&BatchConfig::default())
    }
}
