use std::sync::Arc;

use spanrelay_core::config::Config;
use spanrelay_core::model::span::{AttrValue, StatusCode};
use spanrelay_pipeline::{BatchStats, InMemorySink, TraceSpanHandler};

#[test]
fn mixed_batch_keeps_decodable_records_and_flushes_once() {
    let sink = Arc::new(InMemorySink::new());
    let handler = TraceSpanHandler::build(&Config::new(1.0), sink.clone()).unwrap();

    let stats = handler.handle_batch(&testkit::mixed_batch());

    // the valid child and the root with the bad parent survive; the broken
    // trace id and broken span id do not
    assert_eq!(
        stats,
        BatchStats {
            processed: 4,
            skipped_decode: 2,
            skipped_sampling: 0,
            exported: 2,
        }
    );
    assert_eq!(sink.exported_count(), 2);
    assert_eq!(sink.flush_count(), 1);

    let spans = sink.exported();
    assert_eq!(spans[0].parent_span_id.to_hex(), testkit::PARENT_SPAN_ID);
    assert!(spans[1].parent_span_id.is_zero());
    for span in &spans {
        assert_eq!(span.context.trace_id.to_hex(), testkit::TRACE_ID);
        assert!(span.context.sampled);
        assert!(span.has_remote_parent);
    }
}

#[test]
fn disabled_handler_never_touches_the_sink() {
    let sink = Arc::new(InMemorySink::new());
    let handler = TraceSpanHandler::build(&Config::default(), sink.clone()).unwrap();

    let stats = handler.handle_batch(&testkit::mixed_batch());

    assert_eq!(stats, BatchStats::default());
    assert_eq!(sink.exported_count(), 0);
    assert_eq!(sink.flush_count(), 0);
}

#[test]
fn http_failure_records_carry_status_and_attribute() {
    let sink = Arc::new(InMemorySink::new());
    let handler = TraceSpanHandler::build(&Config::new(1.0), sink.clone()).unwrap();

    handler.handle_batch(&[testkit::not_found_record()]);

    let spans = sink.exported();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].attributes["http.status_code"], AttrValue::Int(404));
    let status = spans[0].status.as_ref().unwrap();
    assert_eq!(status.code, StatusCode::NotFound);
    // tags unrelated to status pass through untouched
    assert_eq!(
        spans[0].attributes["http.method"],
        AttrValue::Text("GET".to_string())
    );
}

#[test]
fn batches_are_independent_invocations() {
    let sink = Arc::new(InMemorySink::new());
    let handler = TraceSpanHandler::build(&Config::new(1.0), sink.clone()).unwrap();

    let record = testkit::span_record(testkit::TRACE_ID, testkit::SPAN_ID, "");
    let first = handler.handle_batch(std::slice::from_ref(&record));
    let second = handler.handle_batch(std::slice::from_ref(&record));

    // counters do not accumulate across invocations
    assert_eq!(first.exported, 1);
    assert_eq!(second.exported, 1);
    assert_eq!(sink.exported_count(), 2);
    assert_eq!(sink.flush_count(), 2);

    handler.close();
    handler.close();
}
