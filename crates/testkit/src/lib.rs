use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use spanrelay_core::model::span::{InputSpanRecord, TagValue};

pub const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
pub const SPAN_ID: &str = "00f067aa0ba902b7";
pub const PARENT_SPAN_ID: &str = "463ac35c9f6413ad";

/// One well-formed record with the given identifiers and a small tag set.
pub fn span_record(trace_id: &str, span_id: &str, parent_span_id: &str) -> InputSpanRecord {
    let base = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    InputSpanRecord {
        trace_id: trace_id.to_string(),
        span_id: span_id.to_string(),
        parent_span_id: parent_span_id.to_string(),
        span_name: "GET /v1/orders".to_string(),
        start_time: base,
        end_time: base + Duration::milliseconds(1800),
        span_tags: HashMap::from([
            ("http.method".to_string(), TagValue::Text("GET".to_string())),
            ("retries".to_string(), TagValue::Int(2)),
        ]),
        http_status_code: 0,
    }
}

/// A batch mixing well-formed, parentless and malformed records: one valid
/// child span, one root span with an undecodable parent id, one with a broken
/// trace id and one with a broken span id.
pub fn mixed_batch() -> Vec<InputSpanRecord> {
    vec![
        span_record(TRACE_ID, SPAN_ID, PARENT_SPAN_ID),
        span_record(TRACE_ID, "a2fb4a1d1a96d312", "not-a-span-id"),
        span_record("not-a-trace-id", SPAN_ID, PARENT_SPAN_ID),
        span_record(TRACE_ID, "bad", PARENT_SPAN_ID),
    ]
}

/// A failing HTTP request observation: 404 with no pre-existing status tag.
pub fn not_found_record() -> InputSpanRecord {
    let mut record = span_record(TRACE_ID, SPAN_ID, "");
    record.span_name = "GET /v1/orders/42".to_string();
    record.http_status_code = 404;
    record
}
