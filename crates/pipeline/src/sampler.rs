use spanrelay_core::ids::{SpanId, TraceId};
use spanrelay_core::model::span::ParentContext;

/// Everything a sampler may consult for one decision. The probability sampler
/// ignores the identifiers and name, but the shape leaves room for policies
/// that do not.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParameters<'a> {
    pub parent: &'a ParentContext,
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub name: &'a str,
    pub has_remote_parent: bool,
}

/// Samples spans at a fixed probability. Only built for a positive
/// probability; a configured probability of 0 means no sampler exists and the
/// whole tracing path is skipped at the batch level.
///
/// The decision is a fresh uniform draw per call, so repeated calls with
/// identical inputs may disagree. Holds no mutable state and is safe to share
/// across concurrently running batches.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilitySampler {
    probability: f64,
}

impl ProbabilitySampler {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn should_sample(&self, _params: &SamplingParameters<'_>) -> bool {
        if self.probability >= 1.0 {
            return true;
        }
        if self.probability <= 0.0 {
            return false;
        }
        rand::random::<f64>() < self.probability
    }
}
