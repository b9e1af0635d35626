//! apicheck-runner: fixture discovery, HTTP execution, and scheduling
//!
//! Discovers fixture files by glob, executes each fixture's steps in order
//! over a blocking reqwest client, compares responses structurally, and
//! fans evaluations out across a bounded worker pool.

pub mod compare;
pub mod evaluate;
pub mod executor;
pub mod health;
pub mod scheduler;
pub mod store;

pub use compare::compare;
pub use evaluate::evaluate;
pub use executor::{HttpExecutor, StepExecutor, StepResponse, TransportError};
pub use health::{HealthError, wait_until_healthy};
pub use scheduler::{Scheduler, SchedulerError};
pub use store::StoreError;
