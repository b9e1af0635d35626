//! Project configuration for the fixture runner

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Worker count for the healthcheck-gated full-suite run.
pub const DEFAULT_SUITE_WORKERS: usize = 10;

/// Worker count for a manual/targeted run.
pub const DEFAULT_TARGETED_WORKERS: usize = 3;

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service under test
    pub base_url: String,

    /// Glob pattern for fixture discovery
    #[serde(default = "default_fixtures")]
    pub fixtures: String,

    /// HTTP headers sent with every request (auth, API keys, etc.)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request timeout in seconds (optional, transport default otherwise)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Health endpoint polled before the full suite runs
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Seconds to wait for the health check before giving up
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    /// Worker pool size override (defaults depend on run mode)
    #[serde(default)]
    pub workers: Option<usize>,
}

fn default_fixtures() -> String {
    "fixtures/**/*.json".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

const fn default_health_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            fixtures: default_fixtures(),
            headers: HashMap::new(),
            request_timeout_secs: None,
            health_path: default_health_path(),
            health_timeout_secs: default_health_timeout(),
            workers: None,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from default location (.apicheck.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".apicheck.toml", "apicheck.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    /// Create example config file
    #[must_use]
    pub fn example() -> &'static str {
        r#"# apicheck configuration

# Service under test
base_url = "http://localhost:8080"

# Fixture discovery (recursive glob)
fixtures = "fixtures/**/*.json"

# Health endpoint gating the full-suite run
health_path = "/health"
health_timeout_secs = 60

# Per-request timeout in seconds (transport default when unset)
# request_timeout_secs = 30

# Worker pool size (default: 10 for full runs, 3 for targeted runs)
# workers = 10

# HTTP headers sent with every request
[headers]
# Authorization = "Bearer your-token-here"
# X-API-Key = "your-api-key"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(String, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
