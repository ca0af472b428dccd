use std::{collections::BTreeMap, fmt};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const GENERAL_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

// ----------------- Validation Errors -----------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

/// A payload (outbound or inbound) did not match its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    pub(crate) fn from_issues(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Prefixes every issue path, e.g. `status` becomes `items[3].status`.
    pub fn nested(mut self, prefix: &str) -> Self {
        for issue in &mut self.issues {
            issue.path = if issue.path.is_empty() {
                prefix.to_owned()
            } else if issue.path.starts_with('[') {
                format!("{}{}", prefix, issue.path)
            } else {
                format!("{}.{}", prefix, issue.path)
            };
        }
        self
    }

    pub fn field_errors(&self) -> BTreeMap<String, String> {
        self.issues
            .iter()
            .map(|issue| (issue.path.clone(), issue.message.clone()))
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .issues
            .iter()
            .map(|issue| match issue.path.as_str() {
                "" => issue.message.clone(),
                path => format!("{}: {}", path, issue.message),
            })
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation failed: {}", rendered)
    }
}

impl std::error::Error for ValidationError {}

// ----------------- Api Errors -----------------

#[derive(Debug, Deserialize)]
struct UnprocessableBody {
    detail: Vec<DetailEntry>,
}

#[derive(Debug, Deserialize)]
struct DetailEntry {
    #[serde(default)]
    loc: Vec<Value>,
    msg: String,
}

/// A completed HTTP exchange that came back with a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("server responded with status {status}")]
pub struct ApiError {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiError {
    /// Unpacks a 422 `{detail: [{loc, msg}]}` body into messages keyed by the
    /// last segment of each location.
    pub fn field_errors(&self) -> Option<BTreeMap<String, String>> {
        if self.status != 422 {
            return None;
        }
        let body = self.body.clone()?;
        let UnprocessableBody { detail } = serde_json::from_value(body).ok()?;
        let errors = detail
            .into_iter()
            .map(|DetailEntry { loc, msg }| {
                let field = match loc.last() {
                    Some(segment) if is_blank_segment(segment) => "unknown".to_string(),
                    Some(Value::String(segment)) => segment.clone(),
                    Some(other) => other.to_string(),
                    None => "unknown".to_string(),
                };
                (field, msg)
            })
            .collect();
        Some(errors)
    }
}

// Empty, zero, false and null segments name no field.
fn is_blank_segment(segment: &Value) -> bool {
    match segment {
        Value::Null | Value::Bool(false) => true,
        Value::String(segment) => segment.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        _ => false,
    }
}

// ----------------- Client Errors -----------------

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response body was not valid JSON: {0}")]
    UnparseableBody(#[from] serde_json::Error),
}

/// What a submission form shows after a failed create or patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFeedback {
    Fields(BTreeMap<String, String>),
    General(String),
}

impl ClientError {
    pub fn feedback(&self) -> SubmissionFeedback {
        let fields = match self {
            ClientError::Validation(error) => Some(error.field_errors()),
            ClientError::Api(error) => error.field_errors(),
            ClientError::Network(_) | ClientError::UnparseableBody(_) => None,
        };
        match fields {
            Some(fields) if !fields.is_empty() => SubmissionFeedback::Fields(fields),
            _ => SubmissionFeedback::General(GENERAL_FAILURE_MESSAGE.to_string()),
        }
    }
}
