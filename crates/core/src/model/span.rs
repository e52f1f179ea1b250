use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{SpanId, TraceId};

/// A tag value as reported by an instrumented call site. Only text, integer
/// and float values survive attribute coercion unchanged; anything else is
/// carried as `Other` and rendered to text during assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Int(i64),
    Float(f64),
    Other(serde_json::Value),
}

/// An exporter-facing attribute value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// One span observation as produced by an instrumented call site.
/// Identifiers arrive in their B3-style hex text form; `parent_span_id` may
/// be empty and `http_status_code` of 0 means no status was reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSpanRecord {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: String,
    pub span_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub span_tags: HashMap<String, TagValue>,
    pub http_status_code: i64,
}

/// The decoded context of a record's parent. The parent span id degrades to
/// zero when absent or undecodable; the trace id never does (records with an
/// undecodable trace id are dropped before this is built).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParentContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpanKind {
    Unspecified,
    Client,
    Server,
}

/// Canonical census status codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl StatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpanStatus {
    pub code: StatusCode,
    pub message: String,
}

impl SpanStatus {
    /// Maps an HTTP response status onto a span status. Any 2xx is OK; the
    /// specific 4xx/5xx codes below get their census counterpart and every
    /// other non-2xx collapses to UNKNOWN.
    pub fn from_http(http_status: i64) -> Self {
        let code = if (200..300).contains(&http_status) {
            StatusCode::Ok
        } else {
            match http_status {
                400 => StatusCode::InvalidArgument,
                401 => StatusCode::Unauthenticated,
                403 => StatusCode::PermissionDenied,
                404 => StatusCode::NotFound,
                412 => StatusCode::FailedPrecondition,
                416 => StatusCode::OutOfRange,
                429 => StatusCode::ResourceExhausted,
                499 => StatusCode::Cancelled,
                501 => StatusCode::Unimplemented,
                503 => StatusCode::Unavailable,
                504 => StatusCode::DeadlineExceeded,
                _ => StatusCode::Unknown,
            }
        };
        Self {
            code,
            message: code.as_str().to_string(),
        }
    }
}

/// The normalized span handed to the exporter sink. `context.sampled` is
/// always true by the time one of these exists, and `has_remote_parent` is
/// always true because every input record originates outside this process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpanData {
    pub kind: SpanKind,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub parent_span_id: SpanId,
    pub context: SpanContext,
    pub has_remote_parent: bool,
    pub status: Option<SpanStatus>,
    pub attributes: HashMap<String, AttrValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_census_codes() {
        assert_eq!(SpanStatus::from_http(200).code, StatusCode::Ok);
        assert_eq!(SpanStatus::from_http(204).code, StatusCode::Ok);
        assert_eq!(SpanStatus::from_http(404).code, StatusCode::NotFound);
        assert_eq!(SpanStatus::from_http(429).code, StatusCode::ResourceExhausted);
        assert_eq!(SpanStatus::from_http(499).code, StatusCode::Cancelled);
        assert_eq!(SpanStatus::from_http(503).code, StatusCode::Unavailable);
        assert_eq!(SpanStatus::from_http(504).code, StatusCode::DeadlineExceeded);
    }

    #[test]
    fn unmapped_codes_collapse_to_unknown() {
        assert_eq!(SpanStatus::from_http(100).code, StatusCode::Unknown);
        assert_eq!(SpanStatus::from_http(302).code, StatusCode::Unknown);
        assert_eq!(SpanStatus::from_http(500).code, StatusCode::Unknown);
        assert_eq!(SpanStatus::from_http(418).code, StatusCode::Unknown);
    }

    #[test]
    fn status_message_is_canonical_name() {
        assert_eq!(SpanStatus::from_http(404).message, "NOT_FOUND");
        assert_eq!(SpanStatus::from_http(200).message, "OK");
    }

    #[test]
    fn tag_values_deserialize_untagged() {
        let tags: HashMap<String, TagValue> = serde_json::from_str(
            r#"{"method": "GET", "retries": 2, "elapsed": 1.5, "cached": true}"#,
        )
        .unwrap();
        assert_eq!(tags["method"], TagValue::Text("GET".to_string()));
        assert_eq!(tags["retries"], TagValue::Int(2));
        assert_eq!(tags["elapsed"], TagValue::Float(1.5));
        assert_eq!(tags["cached"], TagValue::Other(serde_json::Value::Bool(true)));
    }
}
