//! Fixture evaluation — ordered steps, fail-fast, layered failure context
//!
//! One fixture runs as a small state machine: PENDING, then RUNNING over
//! steps 0..N-1 strictly in file order, terminating at PASSED after the
//! last step or at FAILED on the first failing step. Earlier steps may have
//! side effects later steps depend on, so there is no reordering and no
//! partial continuation past a failure.

use apicheck_core::{Fixture, FixtureOutcome, Step, StepError, StepFailure};

use crate::compare;
use crate::executor::StepExecutor;

/// Evaluate one fixture against `executor`, producing a single outcome.
///
/// Failures are logged twice: once with step context (index, URL,
/// description, response content) and once with fixture context, so logs
/// always show both the fixture file and the exact step that broke.
pub fn evaluate<E: StepExecutor + ?Sized>(executor: &E, fixture: &Fixture) -> FixtureOutcome {
    for (index, step) in fixture.steps.iter().enumerate() {
        tracing::debug!(
            fixture = %fixture.path,
            step = index,
            method = %step.request.method,
            url = %step.request.url,
            "executing step"
        );

        if let Err((response_body, error)) = run_step(executor, step) {
            let failure = StepFailure {
                index,
                url: step.request.url.clone(),
                description: step.request.description.clone(),
                response_body,
                error,
            };

            tracing::error!(
                fixture = %fixture.path,
                step = index,
                url = %failure.url,
                "error executing step: {}",
                failure.error
            );
            if let Some(description) = &failure.description {
                tracing::error!(step = index, "step description: {description}");
            }
            if let Some(body) = &failure.response_body {
                tracing::error!("response content: {body}");
            }
            tracing::error!(fixture = %fixture.path, "error executing fixture");

            return FixtureOutcome::failed(&fixture.path, fixture.len(), failure);
        }
    }

    FixtureOutcome::passed(&fixture.path, fixture.len())
}

/// Run one step: execute, then compare. On failure, carries the raw
/// response body when one was received.
fn run_step<E: StepExecutor + ?Sized>(
    executor: &E,
    step: &Step,
) -> Result<(), (Option<String>, StepError)> {
    let response = executor
        .execute(&step.request)
        .map_err(|e| (None, StepError::Transport(e.to_string())))?;
    let body = response.body.clone();
    compare::compare(&response, step.response.as_ref()).map_err(|e| (Some(body), e))
}
