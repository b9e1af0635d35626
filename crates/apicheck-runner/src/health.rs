//! Health-check gate — thin polling wrapper
//!
//! The full suite must not start until the service answers 2xx on its
//! health endpoint. This is deliberately a thin collaborator: poll, log,
//! give up at the deadline.

use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("service at {url} not healthy after {waited:?}")]
    Timeout { url: String, waited: Duration },
}

/// Poll `base_url + path` until it answers 2xx or `timeout` elapses.
///
/// # Errors
///
/// Returns [`HealthError::Timeout`] when the deadline passes without a
/// healthy response.
pub fn wait_until_healthy(
    base_url: &str,
    path: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), HealthError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| HealthError::Http(e.to_string()))?;

    let url = format!("{base_url}{path}");
    let deadline = Instant::now() + timeout;

    loop {
        match client.get(&url).send() {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(%url, "service healthy");
                return Ok(());
            }
            Ok(resp) => {
                tracing::debug!(%url, status = resp.status().as_u16(), "health check not ready");
            }
            Err(e) => {
                tracing::debug!(%url, "health check failed: {e}");
            }
        }

        if Instant::now() >= deadline {
            return Err(HealthError::Timeout {
                url,
                waited: timeout,
            });
        }
        std::thread::sleep(interval);
    }
}
