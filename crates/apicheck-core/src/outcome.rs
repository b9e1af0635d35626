//! Step and fixture outcomes, and the aggregate run summary

use crate::diff::{self, Difference};

/// Why one step failed.
///
/// Assertion kinds carry the diagnostic payload (expected vs actual, diff
/// detail); transport and configuration kinds carry the underlying message.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Network/connection failure. Fatal to the step, no retry.
    #[error("transport error: {0}")]
    Transport(String),

    /// Actual status was not in the accepted set.
    #[error("unexpected status {status}, expected one of {expected:?}")]
    UnexpectedStatus { status: u16, expected: Vec<u16> },

    /// Actual body did not structurally match the expected JSON.
    #[error("response body does not match expected JSON:\n{}", diff::render(.differences))]
    BodyMismatch { differences: Vec<Difference> },

    /// A body check applied but the actual body was not JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidBody(String),

    /// An `exclude_regex_paths` entry failed to compile.
    #[error("invalid exclusion pattern '{pattern}': {message}")]
    InvalidExclusion { pattern: String, message: String },
}

/// The first failing step of a fixture, with enough context to reproduce:
/// 0-based index, URL, optional description, and the raw response body.
#[derive(Debug, thiserror::Error)]
#[error("step {index} ({url}): {error}")]
pub struct StepFailure {
    pub index: usize,
    pub url: String,
    pub description: Option<String>,
    /// Response body at the point of failure, when a response was received.
    pub response_body: Option<String>,
    #[source]
    pub error: StepError,
}

/// Per-fixture outcome: passed, or failed at exactly one step.
#[derive(Debug)]
pub struct FixtureOutcome {
    /// Fixture name (its source path).
    pub fixture: String,
    /// Number of steps the fixture declares.
    pub steps: usize,
    pub result: Result<(), StepFailure>,
}

impl FixtureOutcome {
    #[must_use]
    pub fn passed(fixture: impl Into<String>, steps: usize) -> Self {
        Self {
            fixture: fixture.into(),
            steps,
            result: Ok(()),
        }
    }

    #[must_use]
    pub fn failed(fixture: impl Into<String>, steps: usize, failure: StepFailure) -> Self {
        Self {
            fixture: fixture.into(),
            steps,
            result: Err(failure),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate result of one `run_all` invocation.
///
/// Fixture failures are isolated from one another; the run as a whole is
/// failed if any fixture failed or failed to load.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub outcomes: Vec<FixtureOutcome>,
    /// Fixtures that never ran because their file did not parse.
    pub load_errors: Vec<LoadError>,
}

/// A fixture file that could not be loaded, attributed to its path.
#[derive(Debug)]
pub struct LoadError {
    pub path: String,
    pub message: String,
}

impl RunSummary {
    /// Record one evaluated fixture.
    pub fn record(&mut self, outcome: FixtureOutcome) {
        self.total += 1;
        if outcome.is_pass() {
            self.passed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Record a fixture that failed to load. Counts as a failed fixture.
    pub fn record_load_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.total += 1;
        self.load_errors.push(LoadError {
            path: path.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed() == 0
    }

    /// Failed fixtures, in completion order.
    pub fn failures(&self) -> impl Iterator<Item = &FixtureOutcome> {
        self.outcomes.iter().filter(|o| !o.is_pass())
    }

    /// Process exit code: 0 all passed, 1 any failure, 3 nothing ran.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 {
            3
        } else if self.failed() > 0 {
            1
        } else {
            0
        }
    }
}
