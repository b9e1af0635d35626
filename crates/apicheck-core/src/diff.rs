//! Structural JSON diff with regex path exclusions
//!
//! Walks actual and expected values in lockstep and reports path-level
//! differences. Paths use the `root['key'][0]` notation, and any subtree
//! whose path matches a compiled exclusion regex is skipped before equality
//! is judged — excluded content never contributes to pass/fail.

use std::mem::discriminant;

use regex::Regex;
use serde_json::Value;

/// One path-level difference between actual and expected JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Path of the diverging node, e.g. `root['items'][2]['name']`.
    pub path: String,
    pub kind: DiffKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiffKind {
    /// Same JSON type, different value.
    ValueChanged { expected: Value, actual: Value },
    /// Different JSON types at the same path.
    TypeChanged { expected: Value, actual: Value },
    /// Present in expected, absent from actual.
    MissingFromActual { expected: Value },
    /// Present in actual, absent from expected.
    UnexpectedInActual { actual: Value },
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiffKind::ValueChanged { expected, actual } => {
                write!(f, "{}: expected {expected}, got {actual}", self.path)
            }
            DiffKind::TypeChanged { expected, actual } => write!(
                f,
                "{}: type changed from {} ({expected}) to {} ({actual})",
                self.path,
                type_name(expected),
                type_name(actual)
            ),
            DiffKind::MissingFromActual { expected } => {
                write!(f, "{}: missing from response (expected {expected})", self.path)
            }
            DiffKind::UnexpectedInActual { actual } => {
                write!(f, "{}: unexpected in response (got {actual})", self.path)
            }
        }
    }
}

/// Render a difference list one-per-line for diagnostics.
#[must_use]
pub fn render(differences: &[Difference]) -> String {
    differences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compiled exclusion patterns matched against diff paths.
#[derive(Debug, Default)]
pub struct ExcludePaths {
    patterns: Vec<Regex>,
}

impl ExcludePaths {
    /// No exclusions.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile a pattern list.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::InvalidPattern`] for the first pattern that is
    /// not a valid regex.
    pub fn compile(patterns: &[String]) -> Result<Self, DiffError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|e| DiffError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// Whether any pattern matches `path`. Unanchored, like deepdiff's
    /// `exclude_regex_paths`.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Compare actual against expected, honoring exclusions.
///
/// An empty result means the values are structurally equal everywhere the
/// exclusions did not apply.
#[must_use]
pub fn diff(actual: &Value, expected: &Value, excludes: &ExcludePaths) -> Vec<Difference> {
    let mut out = Vec::new();
    walk(actual, expected, "root", excludes, &mut out);
    out
}

fn walk(
    actual: &Value,
    expected: &Value,
    path: &str,
    excludes: &ExcludePaths,
    out: &mut Vec<Difference>,
) {
    if excludes.is_excluded(path) {
        return;
    }

    match (actual, expected) {
        (Value::Object(a), Value::Object(e)) => {
            for (key, expected_child) in e {
                let child_path = format!("{path}['{key}']");
                match a.get(key) {
                    Some(actual_child) => {
                        walk(actual_child, expected_child, &child_path, excludes, out);
                    }
                    None => {
                        if !excludes.is_excluded(&child_path) {
                            out.push(Difference {
                                path: child_path,
                                kind: DiffKind::MissingFromActual {
                                    expected: expected_child.clone(),
                                },
                            });
                        }
                    }
                }
            }
            for (key, actual_child) in a {
                if e.contains_key(key) {
                    continue;
                }
                let child_path = format!("{path}['{key}']");
                if !excludes.is_excluded(&child_path) {
                    out.push(Difference {
                        path: child_path,
                        kind: DiffKind::UnexpectedInActual {
                            actual: actual_child.clone(),
                        },
                    });
                }
            }
        }
        (Value::Array(a), Value::Array(e)) => {
            let common = a.len().min(e.len());
            for i in 0..common {
                let child_path = format!("{path}[{i}]");
                walk(&a[i], &e[i], &child_path, excludes, out);
            }
            for (i, expected_child) in e.iter().enumerate().skip(common) {
                let child_path = format!("{path}[{i}]");
                if !excludes.is_excluded(&child_path) {
                    out.push(Difference {
                        path: child_path,
                        kind: DiffKind::MissingFromActual {
                            expected: expected_child.clone(),
                        },
                    });
                }
            }
            for (i, actual_child) in a.iter().enumerate().skip(common) {
                let child_path = format!("{path}[{i}]");
                if !excludes.is_excluded(&child_path) {
                    out.push(Difference {
                        path: child_path,
                        kind: DiffKind::UnexpectedInActual {
                            actual: actual_child.clone(),
                        },
                    });
                }
            }
        }
        _ if discriminant(actual) != discriminant(expected) => {
            out.push(Difference {
                path: path.to_string(),
                kind: DiffKind::TypeChanged {
                    expected: expected.clone(),
                    actual: actual.clone(),
                },
            });
        }
        _ => {
            if actual != expected {
                out.push(Difference {
                    path: path.to_string(),
                    kind: DiffKind::ValueChanged {
                        expected: expected.clone(),
                        actual: actual.clone(),
                    },
                });
            }
        }
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_excludes() -> ExcludePaths {
        ExcludePaths::none()
    }

    fn excludes(patterns: &[&str]) -> ExcludePaths {
        let owned: Vec<String> = patterns.iter().map(|s| (*s).to_string()).collect();
        ExcludePaths::compile(&owned).unwrap()
    }

    #[test]
    fn identical_values_diff_empty() {
        let v = json!({"id": 1, "tags": ["a", "b"], "nested": {"ok": true}});
        assert!(diff(&v, &v, &no_excludes()).is_empty());
    }

    #[test]
    fn value_change_reports_path() {
        let actual = json!({"id": 1, "name": "y"});
        let expected = json!({"id": 1, "name": "x"});
        let diffs = diff(&actual, &expected, &no_excludes());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "root['name']");
        assert_eq!(
            diffs[0].kind,
            DiffKind::ValueChanged {
                expected: json!("x"),
                actual: json!("y"),
            }
        );
    }

    #[test]
    fn nested_path_notation() {
        let actual = json!({"a": {"b": [{"c": 1}]}});
        let expected = json!({"a": {"b": [{"c": 2}]}});
        let diffs = diff(&actual, &expected, &no_excludes());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "root['a']['b'][0]['c']");
    }

    #[test]
    fn type_change_detected() {
        let diffs = diff(&json!({"id": "1"}), &json!({"id": 1}), &no_excludes());
        assert_eq!(diffs.len(), 1);
        assert!(matches!(diffs[0].kind, DiffKind::TypeChanged { .. }));
    }

    #[test]
    fn missing_and_unexpected_keys() {
        let actual = json!({"only_actual": 1});
        let expected = json!({"only_expected": 2});
        let diffs = diff(&actual, &expected, &no_excludes());
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().any(|d| d.path == "root['only_expected']"
            && matches!(d.kind, DiffKind::MissingFromActual { .. })));
        assert!(diffs.iter().any(|d| d.path == "root['only_actual']"
            && matches!(d.kind, DiffKind::UnexpectedInActual { .. })));
    }

    #[test]
    fn array_length_mismatch() {
        let diffs = diff(&json!([1, 2, 3]), &json!([1, 2]), &no_excludes());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "root[2]");
        assert!(matches!(diffs[0].kind, DiffKind::UnexpectedInActual { .. }));
    }

    #[test]
    fn exclusion_suppresses_value_change() {
        let actual = json!({"id": 1, "name": "y"});
        let expected = json!({"id": 1, "name": "x"});
        let ex = excludes(&[r"root\['name'\]"]);
        assert!(diff(&actual, &expected, &ex).is_empty());
    }

    #[test]
    fn exclusion_suppresses_type_change_and_missing_key() {
        let actual = json!({"meta": 42});
        let expected = json!({"meta": {"version": 1}, "audit": {"ts": 0}});
        let ex = excludes(&[r"root\['meta'\]", r"root\['audit'\]"]);
        assert!(diff(&actual, &expected, &ex).is_empty());
    }

    #[test]
    fn exclusion_covers_whole_subtree() {
        let actual = json!({"data": {"inner": {"x": 1}}, "id": 7});
        let expected = json!({"data": {"other": "shape"}, "id": 7});
        let ex = excludes(&[r"root\['data'\]"]);
        assert!(diff(&actual, &expected, &ex).is_empty());
    }

    #[test]
    fn exclusion_is_unanchored_substring_match() {
        // deepdiff applies re.search, so a bare key fragment matches too
        let actual = json!({"outer": {"ts": 1}});
        let expected = json!({"outer": {"ts": 2}});
        let ex = excludes(&[r"\['ts'\]"]);
        assert!(diff(&actual, &expected, &ex).is_empty());
    }

    #[test]
    fn non_matching_exclusion_still_fails() {
        let actual = json!({"id": 1, "name": "y"});
        let expected = json!({"id": 1, "name": "x"});
        let ex = excludes(&[r"root\['other'\]"]);
        assert_eq!(diff(&actual, &expected, &ex).len(), 1);
    }

    #[test]
    fn invalid_pattern_is_error() {
        let err = ExcludePaths::compile(&["[unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn render_joins_differences() {
        let diffs = diff(&json!({"a": 1, "b": 2}), &json!({"a": 9, "b": 8}), &no_excludes());
        let rendered = render(&diffs);
        assert!(rendered.contains("root['a']"));
        assert!(rendered.contains("root['b']"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn scalar_root_mismatch() {
        let diffs = diff(&json!(1), &json!(2), &no_excludes());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "root");
    }
}
