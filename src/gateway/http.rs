//! HTTP client for the analyzer service.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::PromptAnalysis;

use super::error::{AnalyzerError, ErrorContext};
use super::types::*;

/// Maximum allowed response body length (1MB).
const MAX_RESPONSE_LEN: usize = 1_024 * 1_024;

/// Maximum allowed prompt length in characters.
const MAX_PROMPT_CHARS: usize = 100_000;

const DEFAULT_BASE_URL: &str = "http://localhost:5180/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Service root; endpoints are `{base_url}/analyze`, `/rewrite`, `/refine`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AnalyzerConfig {
    /// Read `PROMPTFLOW_ANALYZER_URL` and `PROMPTFLOW_ANALYZER_TIMEOUT_SECONDS`,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var("PROMPTFLOW_ANALYZER_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout = std::env::var("PROMPTFLOW_ANALYZER_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ServiceError {
    error: Option<String>,
}

impl HttpAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AnalyzerError::config(format!(
                "analyzer URL must be http(s): {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| AnalyzerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn from_env() -> Result<Self, AnalyzerError> {
        Self::new(AnalyzerConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn analyze(
        &self,
        prompt: &str,
    ) -> Result<(PromptAnalysis, Option<ServiceUsage>), AnalyzerError> {
        let parsed: AnalyzeApiResponse = self.post("analyze", prompt).await?;
        let result = parsed
            .result
            .ok_or_else(|| AnalyzerError::malformed("missing `result`"))?;
        Ok((PromptAnalysis::from(result), parsed.usage))
    }

    pub async fn rewrite(&self, prompt: &str) -> Result<PromptText, AnalyzerError> {
        let parsed: RewriteApiResponse = self.post("rewrite", prompt).await?;
        let text = parsed
            .result
            .ok_or_else(|| AnalyzerError::malformed("missing `result`"))?;
        Ok(PromptText {
            text,
            usage: parsed.usage,
        })
    }

    pub async fn refine(&self, prompt: &str) -> Result<PromptText, AnalyzerError> {
        let parsed: RefineApiResponse = self.post("refine", prompt).await?;
        let text = parsed
            .final_prompt
            .ok_or_else(|| AnalyzerError::malformed("missing `final_prompt`"))?;
        Ok(PromptText {
            text,
            usage: parsed.usage,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        prompt: &str,
    ) -> Result<T, AnalyzerError> {
        validate_prompt(prompt)?;

        let mut response = self
            .client
            .post(format!("{}/{endpoint}", self.base_url))
            .json(&PromptRequest { prompt })
            .send()
            .await?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Stream response to enforce size limit
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let new_len = bytes.len() + chunk.len();
            if new_len > MAX_RESPONSE_LEN {
                return Err(AnalyzerError::ResponseTooLarge(new_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<ServiceError>(&bytes)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            let ctx = ErrorContext::new().with_status(status.as_u16());
            let context = match request_id {
                Some(id) => ctx.with_request_id(id),
                None => ctx,
            };

            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                message,
                context,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| AnalyzerError::malformed(format!("Invalid JSON: {e}")))
    }
}

fn validate_prompt(prompt: &str) -> Result<(), AnalyzerError> {
    if prompt.trim().is_empty() {
        return Err(AnalyzerError::invalid_request("prompt is empty"));
    }
    let chars = prompt.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(AnalyzerError::invalid_request(format!(
            "prompt too large: {chars} chars (max {MAX_PROMPT_CHARS})"
        )));
    }
    Ok(())
}
