//! Wire types for the analyzer service and their mapping into the data model.

use serde::{Deserialize, Serialize};

use crate::model::{clamp_metric, ConstraintKey, Intent, MetricKey, PromptAnalysis};

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest<'a> {
    pub prompt: &'a str,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Token accounting the service may attach to any response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeApiResponse {
    pub result: Option<AnalyzeResult>,
    #[serde(default)]
    pub usage: Option<ServiceUsage>,
}

/// Raw analysis as the service reports it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeResult {
    pub intent: Option<String>,
    pub constraints_present: Option<Vec<String>>,
    pub scores: Option<Scores>,
    pub suggestions: Option<Vec<String>>,
}

/// Scores on a 0–100 scale.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub depth: Option<f64>,
    pub breadth: Option<f64>,
    pub coherence: Option<f64>,
    pub relevance: Option<f64>,
}

impl Scores {
    fn get(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::Depth => self.depth,
            MetricKey::Breadth => self.breadth,
            MetricKey::Coherence => self.coherence,
            MetricKey::Relevance => self.relevance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RewriteApiResponse {
    pub result: Option<String>,
    #[serde(default)]
    pub usage: Option<ServiceUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefineApiResponse {
    pub final_prompt: Option<String>,
    #[serde(default)]
    pub usage: Option<ServiceUsage>,
}

/// A prompt text returned by the rewrite or refine endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText {
    pub text: String,
    pub usage: Option<ServiceUsage>,
}

// =============================================================================
// MAPPING
// =============================================================================

impl From<AnalyzeResult> for PromptAnalysis {
    fn from(raw: AnalyzeResult) -> Self {
        let mut analysis = PromptAnalysis {
            intent: raw
                .intent
                .as_deref()
                .map(Intent::parse_lenient)
                .unwrap_or_default(),
            suggestions: raw.suggestions.unwrap_or_default(),
            ..Default::default()
        };

        let present = raw.constraints_present.unwrap_or_default();
        for key in ConstraintKey::ALL {
            analysis
                .constraints
                .set(key, present.iter().any(|c| c == key.as_str()));
        }

        let scores = raw.scores.unwrap_or_default();
        for key in MetricKey::ALL {
            let value = scores.get(key).unwrap_or(0.0) / 100.0;
            analysis.metrics.set(key, clamp_metric(value));
        }

        analysis
    }
}
