use std::sync::Arc;

use spanrelay_core::config::Config;
use spanrelay_core::error::Result;
use spanrelay_core::ids::{SpanId, TraceId};
use spanrelay_core::model::span::{InputSpanRecord, ParentContext, SpanContext};
use tracing::debug;

use crate::assemble::build_span_data;
use crate::export::{ExportGateway, SpanSink};
use crate::sampler::{ProbabilitySampler, SamplingParameters};

/// Per-batch outcome counters. The batch operation itself cannot fail; every
/// record-level problem is absorbed and shows up here instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Records inspected. Zero when tracing is disabled.
    pub processed: usize,
    /// Records dropped because their trace or span identifier did not decode.
    pub skipped_decode: usize,
    /// Records the sampler declined.
    pub skipped_sampling: usize,
    /// Records handed to the sink.
    pub exported: usize,
}

/// Processes batches of span records: decode, sample, assemble, export,
/// flush. Configuration is captured once at build time and never mutated;
/// separate batch invocations may run concurrently on different threads.
pub struct TraceSpanHandler {
    sampler: Option<ProbabilitySampler>,
    gateway: ExportGateway,
}

impl TraceSpanHandler {
    /// Validates the configuration and wires the handler to its sink. A zero
    /// probability builds no sampler at all, which disables the entire
    /// tracing path.
    pub fn build(cfg: &Config, sink: Arc<dyn SpanSink>) -> Result<Self> {
        cfg.validate()?;
        let sampler = (cfg.sample_probability > 0.0)
            .then(|| ProbabilitySampler::new(cfg.sample_probability));
        Ok(Self {
            sampler,
            gateway: ExportGateway::new(sink),
        })
    }

    /// Handles one batch, sequentially and in input order. Identifier decode
    /// failures and sampling rejections drop the affected record silently; a
    /// parent span id that fails to decode degrades to the zero value instead
    /// (root-span treatment) and the record continues.
    pub fn handle_batch(&self, records: &[InputSpanRecord]) -> BatchStats {
        let mut stats = BatchStats::default();
        let Some(sampler) = &self.sampler else {
            // Tracing is not configured.
            return stats;
        };

        for record in records {
            stats.processed += 1;

            let Some(parent) = extract_parent_context(record) else {
                stats.skipped_decode += 1;
                debug!(trace_id = %record.trace_id, "dropping record: undecodable trace id");
                continue;
            };
            let Some(mut context) = extract_span_context(record, &parent) else {
                stats.skipped_decode += 1;
                debug!(span_id = %record.span_id, "dropping record: undecodable span id");
                continue;
            };

            let sampled = sampler.should_sample(&SamplingParameters {
                parent: &parent,
                trace_id: context.trace_id,
                span_id: context.span_id,
                name: &record.span_name,
                has_remote_parent: true,
            });
            if !sampled {
                stats.skipped_sampling += 1;
                continue;
            }

            context.sampled = true;
            self.gateway.export(build_span_data(record, &parent, context));
            stats.exported += 1;
        }

        if stats.exported > 0 {
            self.gateway.try_flush();
        }

        debug!(
            processed = stats.processed,
            skipped_decode = stats.skipped_decode,
            skipped_sampling = stats.skipped_sampling,
            exported = stats.exported,
            "span batch handled"
        );
        stats
    }

    /// Releases resources held by the handler. Nothing is held beyond the
    /// configuration and sink reference, so this is an idempotent no-op.
    pub fn close(&self) {}
}

fn extract_parent_context(record: &InputSpanRecord) -> Option<ParentContext> {
    let trace_id = TraceId::parse(&record.trace_id).ok()?;
    // best-effort: an absent or malformed parent degrades to the zero id
    let span_id = SpanId::parse(&record.parent_span_id).unwrap_or(SpanId::ZERO);
    Some(ParentContext { trace_id, span_id })
}

fn extract_span_context(record: &InputSpanRecord, parent: &ParentContext) -> Option<SpanContext> {
    let span_id = SpanId::parse(&record.span_id).ok()?;
    Some(SpanContext {
        trace_id: parent.trace_id,
        span_id,
        sampled: false,
    })
}
