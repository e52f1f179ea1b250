use std::collections::HashMap;

use spanrelay_core::model::span::{
    AttrValue, InputSpanRecord, ParentContext, SpanContext, SpanData, SpanKind, SpanStatus,
    TagValue,
};

pub const ATTR_HTTP_STATUS_CODE: &str = "http.status_code";

/// Builds the exporter-facing span from one kept record. The caller has
/// already decoded both contexts and marked `context` sampled.
pub fn build_span_data(
    record: &InputSpanRecord,
    parent: &ParentContext,
    context: SpanContext,
) -> SpanData {
    let mut attributes: HashMap<String, AttrValue> = record
        .span_tags
        .iter()
        .map(|(k, v)| (k.clone(), coerce(v)))
        .collect();

    let mut status = None;
    if record.http_status_code > 0 {
        attributes
            .entry(ATTR_HTTP_STATUS_CODE.to_string())
            .or_insert(AttrValue::Int(record.http_status_code));
        status = Some(SpanStatus::from_http(record.http_status_code));
    }

    SpanData {
        kind: SpanKind::Server,
        name: record.span_name.clone(),
        start_time: record.start_time,
        end_time: record.end_time,
        parent_span_id: parent.span_id,
        context,
        has_remote_parent: true,
        status,
        attributes,
    }
}

/// Text, integer and float tags pass through unchanged; everything else is
/// rendered to its canonical text form.
fn coerce(value: &TagValue) -> AttrValue {
    match value {
        TagValue::Text(s) => AttrValue::Text(s.clone()),
        TagValue::Int(i) => AttrValue::Int(*i),
        TagValue::Float(f) => AttrValue::Float(*f),
        TagValue::Other(v) => AttrValue::Text(json_text(v)),
    }
}

fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
