//! Metrics sinks
//!
//! A sink forwards one utilization sample to a monitoring backend. Emission
//! is best-effort: callers treat every `EmitError` as non-fatal.

mod http;

pub use http::{
    HttpMetricsSink, MetricDatum, PutMetricDataRequest, WireDimension, DEFAULT_NAMESPACE,
};

use crate::models::UtilizationSample;
use thiserror::Error;

pub use async_trait::async_trait;

/// Acknowledgement returned by a sink for an accepted sample
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// Backend request identifier, when the backend returns one
    pub request_id: Option<String>,
}

/// Sink failures
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("metrics backend rejected sample ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode sample: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait for metrics sink implementations
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Forward one sample
    async fn emit(&self, sample: &UtilizationSample) -> Result<Ack, EmitError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Sink that accepts and drops every sample
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl MetricsSink for NoopSink {
    async fn emit(&self, _sample: &UtilizationSample) -> Result<Ack, EmitError> {
        Ok(Ack::default())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
