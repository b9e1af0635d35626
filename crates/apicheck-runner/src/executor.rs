//! Step execution — one request spec becomes one real HTTP call
//!
//! The untyped options carried by a step (`json`, `body`, `headers`,
//! `params`) are split into a typed [`RequestOptions`] before the call is
//! built; an unrecognized option key is a configuration error, not a
//! dynamic dispatch failure. No retry: a transport error is fatal to the
//! step.

use std::collections::HashMap;
use std::time::Duration;

use apicheck_core::{Method, RequestSpec};
use serde_json::Value;

/// Actual response observed for one step.
#[derive(Debug, Clone)]
pub struct StepResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unsupported request option '{0}'")]
    UnsupportedOption(String),
    #[error("invalid request option '{option}': {message}")]
    InvalidOption { option: String, message: String },
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
}

/// Seam between the evaluator and the transport.
///
/// Production uses [`HttpExecutor`]; tests substitute an in-memory stub.
pub trait StepExecutor: Sync {
    /// Execute one step's request against the service under test.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connection failure or a malformed
    /// request spec.
    fn execute(&self, request: &RequestSpec) -> Result<StepResponse, TransportError>;
}

/// Typed view of a step's transport options.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct RequestOptions {
    pub(crate) json: Option<Value>,
    pub(crate) body: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) params: Vec<(String, String)>,
}

/// Split a step's untyped options into [`RequestOptions`].
///
/// Accepted keys mirror the fixture format: `json`, `body`, `headers`,
/// `params`. Anything else is rejected so a typo in a fixture fails loudly.
pub(crate) fn split_options(
    options: &serde_json::Map<String, Value>,
) -> Result<RequestOptions, TransportError> {
    let mut split = RequestOptions::default();
    for (key, value) in options {
        match key.as_str() {
            "json" => split.json = Some(value.clone()),
            "body" => match value {
                Value::String(s) => split.body = Some(s.clone()),
                other => {
                    return Err(TransportError::InvalidOption {
                        option: "body".to_string(),
                        message: format!("expected a string, got {other}"),
                    });
                }
            },
            "headers" => split.headers = string_pairs(key, value)?,
            "params" => split.params = string_pairs(key, value)?,
            other => return Err(TransportError::UnsupportedOption(other.to_string())),
        }
    }
    Ok(split)
}

/// Flatten a JSON object of scalars into (name, value) string pairs.
fn string_pairs(option: &str, value: &Value) -> Result<Vec<(String, String)>, TransportError> {
    let Value::Object(map) = value else {
        return Err(TransportError::InvalidOption {
            option: option.to_string(),
            message: format!("expected an object, got {value}"),
        });
    };
    Ok(map
        .iter()
        .map(|(k, v)| (k.clone(), value_to_string(v)))
        .collect())
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
    }
}

/// Blocking HTTP executor over the service's base URL.
pub struct HttpExecutor {
    client: reqwest::blocking::Client,
    base_url: String,
    headers: HashMap<String, String>,
}

impl HttpExecutor {
    /// Build an executor for `base_url`.
    ///
    /// `headers` are sent with every request. `timeout` applies per request;
    /// when absent the transport default holds and a hung call blocks its
    /// worker.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        headers: HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            headers,
        })
    }
}

impl StepExecutor for HttpExecutor {
    fn execute(&self, request: &RequestSpec) -> Result<StepResponse, TransportError> {
        let options = split_options(&request.options)?;
        let url = format!("{}{}", self.base_url, request.url);

        let mut req = self.client.request(to_reqwest_method(request.method), &url);
        for (name, value) in self.headers.iter().chain(options.headers.iter().map(|(k, v)| (k, v))) {
            if reqwest::header::HeaderValue::from_str(value).is_err() {
                return Err(TransportError::InvalidHeader(name.clone()));
            }
            req = req.header(name, value);
        }
        if !options.params.is_empty() {
            req = req.query(&options.params);
        }
        if let Some(json) = &options.json {
            req = req.json(json);
        }
        if let Some(body) = &options.body {
            req = req.body(body.clone());
        }

        let resp = req.send().map_err(|e| TransportError::Http(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(StepResponse { status, body })
    }
}
