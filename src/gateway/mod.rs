//! Gateway to the external prompt-analysis service.
//!
//! Calls are request/response with no automatic retry: a failed call is
//! surfaced once and the caller decides what to do.

pub mod error;
pub mod http;
pub mod types;
pub mod usage;

use std::sync::Arc;
use std::time::Instant;

use crate::model::PromptAnalysis;

use usage::{AnalyzerCallRecord, UsageSink as UsageSinkTrait};

pub use error::{AnalyzerError, ErrorContext};
pub use http::{AnalyzerConfig, HttpAnalyzer};
pub use types::{AnalyzeResult, PromptText, Scores, ServiceUsage};
pub use usage::{NoopUsageSink, TracingUsageSink, UsageSink};

#[async_trait::async_trait]
pub trait PromptAnalyzer: Send + Sync {
    async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, AnalyzerError>;

    async fn rewrite(&self, prompt: &str) -> Result<PromptText, AnalyzerError>;

    async fn refine(&self, prompt: &str) -> Result<PromptText, AnalyzerError>;
}

/// HTTP analyzer plus usage accounting.
pub struct AnalyzerGateway<U: UsageSinkTrait> {
    client: HttpAnalyzer,
    usage_sink: Arc<U>,
}

impl<U: UsageSinkTrait> AnalyzerGateway<U> {
    pub fn new(client: HttpAnalyzer, usage_sink: Arc<U>) -> Self {
        Self { client, usage_sink }
    }

    pub fn from_env(usage_sink: Arc<U>) -> Result<Self, AnalyzerError> {
        Ok(Self::new(HttpAnalyzer::from_env()?, usage_sink))
    }

    pub fn client(&self) -> &HttpAnalyzer {
        &self.client
    }

    async fn finish<T: Send>(
        &self,
        endpoint: &'static str,
        prompt: &str,
        started: Instant,
        result: Result<(T, Option<ServiceUsage>), AnalyzerError>,
    ) -> Result<T, AnalyzerError> {
        let record = AnalyzerCallRecord::new(endpoint, prompt.chars().count())
            .latency(started.elapsed().as_millis() as u64);

        match result {
            Ok((value, usage)) => {
                self.usage_sink.record(record.usage(usage)).await;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    endpoint,
                    code = err.code(),
                    request_id = err.request_id().unwrap_or(""),
                    "analyzer call failed: {err}"
                );
                self.usage_sink.record(record.error(err.code())).await;
                Err(err)
            }
        }
    }
}

#[async_trait::async_trait]
impl<U: UsageSinkTrait> PromptAnalyzer for AnalyzerGateway<U> {
    async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, AnalyzerError> {
        let started = Instant::now();
        let result = self.client.analyze(prompt).await;
        self.finish("analyze", prompt, started, result).await
    }

    async fn rewrite(&self, prompt: &str) -> Result<PromptText, AnalyzerError> {
        let started = Instant::now();
        let result = self
            .client
            .rewrite(prompt)
            .await
            .map(|t| {
                let usage = t.usage;
                (t, usage)
            });
        self.finish("rewrite", prompt, started, result).await
    }

    async fn refine(&self, prompt: &str) -> Result<PromptText, AnalyzerError> {
        let started = Instant::now();
        let result = self
            .client
            .refine(prompt)
            .await
            .map(|t| {
                let usage = t.usage;
                (t, usage)
            });
        self.finish("refine", prompt, started, result).await
    }
}
