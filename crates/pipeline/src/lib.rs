pub mod assemble;
pub mod export;
pub mod handler;
pub mod sampler;

pub use export::{ExportGateway, Flusher, InMemorySink, SpanSink};
pub use handler::{BatchStats, TraceSpanHandler};
pub use sampler::{ProbabilitySampler, SamplingParameters};
