//! Fixture data model and parsing
//!
//! A fixture file is a JSON array of steps. Each step is one request plus an
//! optional expected response. Fixtures are immutable once loaded.

use serde::{Deserialize, Serialize};

/// Status codes accepted when a step declares no `status_codes`.
pub const DEFAULT_STATUS_CODES: [u16; 3] = [200, 202, 204];

/// Supported HTTP methods.
///
/// A closed set: a fixture naming any other method fails at parse time with
/// a configuration error rather than at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step's request: typed fields plus untyped transport options.
///
/// `method`, `url`, and `description` are extracted into fields; every other
/// key (`json`, `body`, `headers`, `params`) stays in `options` and is
/// forwarded verbatim to the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method, defaults to POST when the fixture omits it.
    #[serde(default)]
    pub method: Method,

    /// Path relative to the service base URL. Required.
    pub url: String,

    /// Optional human-readable step description, surfaced in failure logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remaining request options, passed through to the transport.
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Expected response for one step. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Accepted status codes. Absent means [`DEFAULT_STATUS_CODES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<Vec<u16>>,

    /// Expected JSON body. Absent means the body is not checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,

    /// Regexes matched against diff paths; matching subtrees are ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_regex_paths: Vec<String>,
}

impl ResponseSpec {
    /// Whether `status` is acceptable for this spec.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match &self.status_codes {
            Some(codes) => codes.contains(&status),
            None => DEFAULT_STATUS_CODES.contains(&status),
        }
    }

    /// The status set this spec accepts, for diagnostics.
    #[must_use]
    pub fn expected_statuses(&self) -> Vec<u16> {
        match &self.status_codes {
            Some(codes) => codes.clone(),
            None => DEFAULT_STATUS_CODES.to_vec(),
        }
    }
}

/// One request/response pair within a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub request: RequestSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// An ordered sequence of steps loaded from one fixture file.
///
/// Steps execute strictly in order; earlier steps may create state later
/// steps depend on, so a fixture is never re-ordered or parallelized
/// internally.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Source path, used as the fixture's name in logs and reports.
    pub path: String,
    pub steps: Vec<Step>,
}

impl Fixture {
    /// Parse a fixture from the JSON content of one file.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Parse`] if the content is not a JSON array of
    /// steps or a step lacks `request.url`. The error names the file so a
    /// bad fixture never obscures which file broke.
    pub fn from_json(path: impl Into<String>, content: &str) -> Result<Self, FixtureError> {
        let path = path.into();
        let steps: Vec<Step> = serde_json::from_str(content).map_err(|e| FixtureError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { path, steps })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("{path}: {message}")]
    Parse { path: String, message: String },
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_fixture() {
        let fixture =
            Fixture::from_json("t.json", r#"[{"request": {"url": "/health"}}]"#).unwrap();
        assert_eq!(fixture.len(), 1);
        let step = &fixture.steps[0];
        assert_eq!(step.request.method, Method::Post);
        assert_eq!(step.request.url, "/health");
        assert!(step.request.description.is_none());
        assert!(step.request.options.is_empty());
        assert!(step.response.is_none());
    }

    #[test]
    fn parse_empty_fixture() {
        let fixture = Fixture::from_json("empty.json", "[]").unwrap();
        assert!(fixture.is_empty());
    }

    #[test]
    fn method_defaults_to_post() {
        assert_eq!(Method::default(), Method::Post);
    }

    #[test]
    fn parse_explicit_method_and_description() {
        let fixture = Fixture::from_json(
            "t.json",
            r#"[{"request": {"method": "get", "url": "/entity/1", "description": "fetch"}}]"#,
        )
        .unwrap();
        let req = &fixture.steps[0].request;
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.description.as_deref(), Some("fetch"));
    }

    #[test]
    fn unknown_method_is_parse_error() {
        let err = Fixture::from_json(
            "bad.json",
            r#"[{"request": {"method": "brew", "url": "/coffee"}}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn missing_url_is_parse_error() {
        let err = Fixture::from_json("bad.json", r#"[{"request": {"method": "get"}}]"#)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.json"));
        assert!(msg.contains("url"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Fixture::from_json("bad.json", "{ not json").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn transport_options_are_preserved() {
        let fixture = Fixture::from_json(
            "t.json",
            r#"[{"request": {"url": "/entity", "json": {"name": "x"}, "headers": {"X-Test": "1"}}}]"#,
        )
        .unwrap();
        let opts = &fixture.steps[0].request.options;
        assert_eq!(opts.len(), 2);
        assert_eq!(opts["json"]["name"], "x");
        assert_eq!(opts["headers"]["X-Test"], "1");
    }

    #[test]
    fn default_status_codes_accept_success_family() {
        let spec = ResponseSpec::default();
        assert!(spec.accepts(200));
        assert!(spec.accepts(202));
        assert!(spec.accepts(204));
        assert!(!spec.accepts(201));
        assert!(!spec.accepts(404));
        assert!(!spec.accepts(500));
    }

    #[test]
    fn explicit_status_codes_override_default() {
        let fixture = Fixture::from_json(
            "t.json",
            r#"[{"request": {"url": "/x"}, "response": {"status_codes": [404]}}]"#,
        )
        .unwrap();
        let spec = fixture.steps[0].response.as_ref().unwrap();
        assert!(spec.accepts(404));
        assert!(!spec.accepts(200));
        assert_eq!(spec.expected_statuses(), vec![404]);
    }

    #[test]
    fn response_spec_with_json_and_exclusions() {
        let fixture = Fixture::from_json(
            "t.json",
            r#"[{"request": {"url": "/x"},
                 "response": {"json": {"id": 1}, "exclude_regex_paths": ["root\\['ts'\\]"]}}]"#,
        )
        .unwrap();
        let spec = fixture.steps[0].response.as_ref().unwrap();
        assert_eq!(spec.json.as_ref().unwrap()["id"], 1);
        assert_eq!(spec.exclude_regex_paths.len(), 1);
    }
}
