//! Usage tracking via the UsageSink trait.
//!
//! The gateway reports every analyzer call through a UsageSink:
//! - CLI uses TracingUsageSink
//! - Tests and embedded hosts use NoopUsageSink

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::ServiceUsage;

/// Status of an analyzer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    Error,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Success => "success",
            CallStatus::Error => "error",
        }
    }
}

/// Record of one analyzer call.
#[derive(Debug, Clone)]
pub struct AnalyzerCallRecord {
    /// Endpoint: "analyze", "rewrite", "refine".
    pub endpoint: &'static str,
    pub prompt_chars: usize,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub latency_ms: u64,
    pub status: CallStatus,
    /// Error code if status is Error.
    pub error_code: Option<&'static str>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyzerCallRecord {
    pub fn new(endpoint: &'static str, prompt_chars: usize) -> Self {
        Self {
            endpoint,
            prompt_chars,
            input_tokens: None,
            output_tokens: None,
            latency_ms: 0,
            status: CallStatus::Success,
            error_code: None,
            timestamp: Utc::now(),
        }
    }

    pub fn usage(mut self, usage: Option<ServiceUsage>) -> Self {
        if let Some(u) = usage {
            self.input_tokens = u.prompt_tokens;
            self.output_tokens = u.completion_tokens;
        }
        self
    }

    pub fn latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    pub fn error(mut self, code: &'static str) -> Self {
        self.status = CallStatus::Error;
        self.error_code = Some(code);
        self
    }
}

/// Sink for analyzer call records. Recording is fire-and-forget.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, record: AnalyzerCallRecord);
}

/// Discards all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUsageSink;

#[async_trait]
impl UsageSink for NoopUsageSink {
    async fn record(&self, _record: AnalyzerCallRecord) {}
}

/// Emits each record as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn record(&self, record: AnalyzerCallRecord) {
        tracing::info!(
            endpoint = record.endpoint,
            status = record.status.as_str(),
            error_code = record.error_code.unwrap_or(""),
            prompt_chars = record.prompt_chars,
            input_tokens = record.input_tokens.unwrap_or(0),
            output_tokens = record.output_tokens.unwrap_or(0),
            latency_ms = record.latency_ms,
            timestamp = %record.timestamp.to_rfc3339(),
            "analyzer call"
        );
    }
}
