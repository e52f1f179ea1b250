use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use spanrelay_core::error::{RelayError, Result};
use spanrelay_core::model::span::SpanData;
use tracing::warn;

/// Destination for assembled spans. Export is synchronous and fire-and-forget
/// from the pipeline's point of view: the `Result` exists so sinks that can
/// observe delivery failure have somewhere to report it, but the batch handler
/// only logs it and moves on.
///
/// Batches may run concurrently on different threads with no locking in the
/// pipeline, so implementations must tolerate concurrent `export` and `flush`
/// calls.
pub trait SpanSink: Send + Sync {
    fn export(&self, span: SpanData) -> Result<()>;

    /// Optional flush capability. Sinks that buffer internally advertise it
    /// by returning `Some(self)`; the default is no capability.
    fn flusher(&self) -> Option<&dyn Flusher> {
        None
    }
}

/// The optional capability probed after a batch exported at least one span.
pub trait Flusher {
    fn flush(&self);
}

/// Hands assembled spans to the configured sink. Stateless apart from the
/// sink reference; adds no buffering, timeouts or retries.
#[derive(Clone)]
pub struct ExportGateway {
    sink: Arc<dyn SpanSink>,
}

impl ExportGateway {
    pub fn new(sink: Arc<dyn SpanSink>) -> Self {
        Self { sink }
    }

    pub fn export(&self, span: SpanData) {
        if let Err(e) = self.sink.export(span) {
            warn!(error = %e, "span sink rejected record");
        }
    }

    /// Flushes the sink if it advertises the capability; sinks without it are
    /// left untouched.
    pub fn try_flush(&self) {
        if let Some(flusher) = self.sink.flusher() {
            flusher.flush();
        }
    }
}

/// Capture sink: records every exported span and counts flushes. Used by the
/// pipeline's own tests and useful for embedding.
#[derive(Default)]
pub struct InMemorySink {
    spans: Mutex<Vec<SpanData>>,
    flushes: AtomicUsize,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exported(&self) -> Vec<SpanData> {
        self.spans.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn exported_count(&self) -> usize {
        self.spans.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl SpanSink for InMemorySink {
    fn export(&self, span: SpanData) -> Result<()> {
        let mut spans = self
            .spans
            .lock()
            .map_err(|_| RelayError::Export("in-memory sink poisoned".to_string()))?;
        spans.push(span);
        Ok(())
    }

    fn flusher(&self) -> Option<&dyn Flusher> {
        Some(self)
    }
}

impl Flusher for InMemorySink {
    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}
