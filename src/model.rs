//! Core data model: prompt versions and their analysis.
//!
//! Every constraint and metric key is a struct field, so "all keys are always
//! present" holds by construction. Input documents that omit keys get the
//! serde defaults (false / 0.0).

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Keys
// =============================================================================

/// Coarse classification of a prompt's purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Exploratory,
    Analytical,
    Comparative,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Exploratory => "exploratory",
            Intent::Analytical => "analytical",
            Intent::Comparative => "comparative",
        }
    }

    /// Parse an analyzer intent string. Unknown values fall back to exploratory.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "analytical" => Intent::Analytical,
            "comparative" => Intent::Comparative,
            _ => Intent::Exploratory,
        }
    }
}

/// A boolean requirement a prompt may specify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKey {
    Evidence,
    Scope,
    Comparisons,
}

impl ConstraintKey {
    pub const ALL: [ConstraintKey; 3] = [
        ConstraintKey::Evidence,
        ConstraintKey::Scope,
        ConstraintKey::Comparisons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKey::Evidence => "evidence",
            ConstraintKey::Scope => "scope",
            ConstraintKey::Comparisons => "comparisons",
        }
    }
}

/// A continuous quality axis in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Depth,
    Breadth,
    Coherence,
    Relevance,
}

impl MetricKey {
    /// Canonical vector order.
    pub const ALL: [MetricKey; 4] = [
        MetricKey::Depth,
        MetricKey::Breadth,
        MetricKey::Coherence,
        MetricKey::Relevance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Depth => "depth",
            MetricKey::Breadth => "breadth",
            MetricKey::Coherence => "coherence",
            MetricKey::Relevance => "relevance",
        }
    }
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub evidence: bool,
    pub scope: bool,
    pub comparisons: bool,
}

impl Constraints {
    pub fn get(&self, key: ConstraintKey) -> bool {
        match key {
            ConstraintKey::Evidence => self.evidence,
            ConstraintKey::Scope => self.scope,
            ConstraintKey::Comparisons => self.comparisons,
        }
    }

    pub fn set(&mut self, key: ConstraintKey, present: bool) {
        match key {
            ConstraintKey::Evidence => self.evidence = present,
            ConstraintKey::Scope => self.scope = present,
            ConstraintKey::Comparisons => self.comparisons = present,
        }
    }
}

/// Quality axes. Deserialized values are clamped into [0, 1], so loaded
/// documents obey the same range as analyzer results.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    #[serde(deserialize_with = "unit_interval")]
    pub depth: f64,
    #[serde(deserialize_with = "unit_interval")]
    pub breadth: f64,
    #[serde(deserialize_with = "unit_interval")]
    pub coherence: f64,
    #[serde(deserialize_with = "unit_interval")]
    pub relevance: f64,
}

/// Keep a metric inside [0, 1]; non-finite values become 0.
pub fn clamp_metric(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn unit_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_metric)
}

impl Metrics {
    pub fn new(depth: f64, breadth: f64, coherence: f64, relevance: f64) -> Self {
        Self {
            depth,
            breadth,
            coherence,
            relevance,
        }
    }

    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Depth => self.depth,
            MetricKey::Breadth => self.breadth,
            MetricKey::Coherence => self.coherence,
            MetricKey::Relevance => self.relevance,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        match key {
            MetricKey::Depth => self.depth = value,
            MetricKey::Breadth => self.breadth = value,
            MetricKey::Coherence => self.coherence = value,
            MetricKey::Relevance => self.relevance = value,
        }
    }
}

/// The analyzer's scored judgment of one prompt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptAnalysis {
    pub intent: Intent,
    pub constraints: Constraints,
    pub metrics: Metrics,
    pub suggestions: Vec<String>,
}

// =============================================================================
// Version
// =============================================================================

/// One submitted prompt plus its analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersion {
    id: String,
    text: String,
    #[serde(default)]
    analysis: PromptAnalysis,
}

impl PromptVersion {
    /// Create a version with a fresh UUID.
    pub fn new(text: impl Into<String>, analysis: PromptAnalysis) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), text, analysis)
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>, analysis: PromptAnalysis) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            analysis,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn analysis(&self) -> &PromptAnalysis {
        &self.analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let raw = r#"{"id": "a", "text": "t", "analysis": {"metrics": {"depth": 0.4}}}"#;
        let v: PromptVersion = serde_json::from_str(raw).unwrap();
        assert_eq!(v.analysis().intent, Intent::Exploratory);
        assert_eq!(v.analysis().metrics, Metrics::new(0.4, 0.0, 0.0, 0.0));
        assert_eq!(v.analysis().constraints, Constraints::default());
        assert!(v.analysis().suggestions.is_empty());
    }

    #[test]
    fn missing_analysis_is_all_zero() {
        let v: PromptVersion = serde_json::from_str(r#"{"id": "a", "text": "t"}"#).unwrap();
        assert_eq!(v.analysis(), &PromptAnalysis::default());
    }

    #[test]
    fn loaded_metrics_are_clamped() {
        let raw = r#"{"depth": 5.0, "breadth": -2.0, "coherence": 0.25, "relevance": 1}"#;
        let m: Metrics = serde_json::from_str(raw).unwrap();
        assert_eq!(m, Metrics::new(1.0, 0.0, 0.25, 1.0));
        assert_eq!(clamp_metric(f64::NAN), 0.0);
        assert_eq!(clamp_metric(f64::INFINITY), 0.0);
    }

    #[test]
    fn intent_parse_is_lenient() {
        assert_eq!(Intent::parse_lenient(" Comparative "), Intent::Comparative);
        assert_eq!(Intent::parse_lenient("analytical"), Intent::Analytical);
        assert_eq!(Intent::parse_lenient("speculative"), Intent::Exploratory);
    }

    #[test]
    fn new_versions_get_distinct_ids() {
        let a = PromptVersion::new("x", PromptAnalysis::default());
        let b = PromptVersion::new("x", PromptAnalysis::default());
        assert_ne!(a.id(), b.id());
    }
}
