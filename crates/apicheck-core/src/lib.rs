//! apicheck-core: Data model, structural diff, and outcome types
//!
//! This crate provides the fixture data model (ordered request/response
//! steps), the structural JSON diff with regex path exclusions, and the
//! per-step/per-fixture outcome types the runner aggregates.

pub mod config;
pub mod diff;
pub mod fixture;
pub mod outcome;

pub use config::{Config, ConfigError, DEFAULT_SUITE_WORKERS, DEFAULT_TARGETED_WORKERS};
pub use diff::{DiffError, DiffKind, Difference, ExcludePaths};
pub use fixture::{
    DEFAULT_STATUS_CODES, Fixture, FixtureError, Method, RequestSpec, ResponseSpec, Step,
};
pub use outcome::{FixtureOutcome, LoadError, RunSummary, StepError, StepFailure};
