//! Response comparison — status-code membership plus structural body diff
//!
//! Pure logic, no I/O. A step with no expected JSON body passes on status
//! alone; that case is logged as a warning, never treated as a failure.

use apicheck_core::diff::{self, DiffError, ExcludePaths};
use apicheck_core::{DEFAULT_STATUS_CODES, ResponseSpec, StepError};

use crate::executor::StepResponse;

/// Judge an actual response against a step's expected spec.
///
/// # Errors
///
/// Returns [`StepError::UnexpectedStatus`] on status mismatch,
/// [`StepError::BodyMismatch`] with the diff detail on body mismatch,
/// [`StepError::InvalidBody`] when a body check applies but the actual body
/// is not JSON, and [`StepError::InvalidExclusion`] for a bad pattern.
pub fn compare(actual: &StepResponse, expected: Option<&ResponseSpec>) -> Result<(), StepError> {
    let accepted = expected.map_or_else(
        || DEFAULT_STATUS_CODES.to_vec(),
        ResponseSpec::expected_statuses,
    );
    if !accepted.contains(&actual.status) {
        return Err(StepError::UnexpectedStatus {
            status: actual.status,
            expected: accepted,
        });
    }

    let Some(expected_json) = expected.and_then(|spec| spec.json.as_ref()) else {
        tracing::warn!("no expected response json found");
        return Ok(());
    };

    let excludes = expected.map_or_else(
        || Ok(ExcludePaths::none()),
        |spec| ExcludePaths::compile(&spec.exclude_regex_paths),
    )
    .map_err(|e| match e {
        DiffError::InvalidPattern { pattern, message } => {
            StepError::InvalidExclusion { pattern, message }
        }
    })?;

    let actual_json: serde_json::Value =
        serde_json::from_str(&actual.body).map_err(|e| StepError::InvalidBody(e.to_string()))?;

    let differences = diff::diff(&actual_json, expected_json, &excludes);
    if differences.is_empty() {
        Ok(())
    } else {
        Err(StepError::BodyMismatch { differences })
    }
}
