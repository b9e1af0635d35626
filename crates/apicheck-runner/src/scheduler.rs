//! Concurrent fixture scheduling — bounded fan-out, completion-order fan-in
//!
//! Fixtures are independent units of concurrency: submission follows
//! discovery order, outcome logging follows completion order, and one
//! fixture's failure never cancels or affects its siblings. The worker pool
//! is local to a single `run_all` invocation.

use std::path::PathBuf;

use rayon::prelude::*;

use apicheck_core::{Fixture, FixtureError, FixtureOutcome, RunSummary};

use crate::evaluate::evaluate;
use crate::executor::StepExecutor;
use crate::store::{self, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("worker pool error: {0}")]
    Pool(String),
}

/// Runs all discovered fixtures on a fixed-size worker pool.
pub struct Scheduler {
    workers: usize,
}

impl Scheduler {
    /// A scheduler with `workers` concurrent workers (minimum 1).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Discover fixtures matching `pattern` and evaluate them concurrently.
    ///
    /// Files that fail to parse count as failed fixtures without stopping
    /// the rest; the summary is failed if any fixture failed.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] only for tool-level problems: an invalid
    /// glob pattern or a pool that cannot be built.
    pub fn run_all<E: StepExecutor + ?Sized>(
        &self,
        pattern: &str,
        executor: &E,
    ) -> Result<RunSummary, SchedulerError> {
        let entries: Vec<(PathBuf, Result<Fixture, FixtureError>)> =
            store::load(pattern)?.collect();
        tracing::info!(
            pattern,
            fixtures = entries.len(),
            workers = self.workers,
            "running fixtures"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| SchedulerError::Pool(e.to_string()))?;

        let results: Vec<Result<FixtureOutcome, (String, String)>> = pool.install(|| {
            entries
                .par_iter()
                .map(|(path, parsed)| match parsed {
                    Ok(fixture) => {
                        let outcome = evaluate(executor, fixture);
                        // Logged here so ordering reflects completion time,
                        // not submission order.
                        if outcome.is_pass() {
                            tracing::info!(fixture = %outcome.fixture, "fixture passed");
                        } else {
                            tracing::error!(fixture = %outcome.fixture, "fixture failed");
                        }
                        Ok(outcome)
                    }
                    Err(e) => {
                        tracing::error!(fixture = %path.display(), "fixture failed to load: {e}");
                        Err((path.display().to_string(), e.to_string()))
                    }
                })
                .collect()
        });

        let mut summary = RunSummary::default();
        for result in results {
            match result {
                Ok(outcome) => summary.record(outcome),
                Err((path, message)) => summary.record_load_error(path, message),
            }
        }

        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed(),
            "run complete"
        );
        Ok(summary)
    }
}
