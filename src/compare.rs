//! Version comparison: metric vectors, best-version ranking, similarity, and
//! one-directional improvement deltas.
//!
//! All functions here are pure and total. Absence is reported as `None` or an
//! empty list, never as an error.

use serde::Serialize;

use crate::model::{ConstraintKey, MetricKey, PromptVersion};

/// Minimum metric gain (strictly exceeded) that counts as an improvement.
pub const IMPROVEMENT_THRESHOLD: f64 = 0.1;

/// Differences within this distance of the threshold are treated as equal to it.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Metric vectors
// =============================================================================

/// Metrics in `MetricKey::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricVector(pub [f64; 4]);

impl MetricVector {
    pub fn values(&self) -> &[f64; 4] {
        &self.0
    }

    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }
}

/// Ordered `[depth, breadth, coherence, relevance]` for a version, or `None`
/// when there is no version.
pub fn metric_vector(version: Option<&PromptVersion>) -> Option<MetricVector> {
    let metrics = &version?.analysis().metrics;
    Some(MetricVector(MetricKey::ALL.map(|key| metrics.get(key))))
}

// =============================================================================
// Best version
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestVersion {
    pub index: usize,
    /// Mean of the four metrics.
    pub score: f64,
}

impl BestVersion {
    pub fn percent(&self) -> i64 {
        to_percent(self.score)
    }
}

/// The version with the highest mean metric. Ties keep the earliest version.
pub fn best_version(versions: &[PromptVersion]) -> Option<BestVersion> {
    let mut best: Option<BestVersion> = None;
    for (index, version) in versions.iter().enumerate() {
        let Some(vector) = metric_vector(Some(version)) else {
            continue;
        };
        let score = vector.mean();
        if best.map_or(true, |b| score > b.score) {
            best = Some(BestVersion { index, score });
        }
    }
    best
}

// =============================================================================
// Similarity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarMatch {
    pub index: usize,
    /// `1 - mean absolute difference`. Can be negative (down to -3).
    pub similarity: f64,
}

impl SimilarMatch {
    /// Display percentage, clamped into 0..=100.
    pub fn percent(&self) -> i64 {
        to_percent(self.similarity).clamp(0, 100)
    }
}

/// `1 - (Σ|a_i - b_i|) / len`. Symmetric in its arguments.
pub fn similarity(a: &MetricVector, b: &MetricVector) -> f64 {
    let sum_diff: f64 = a.0.iter().zip(b.0.iter()).map(|(x, y)| (x - y).abs()).sum();
    1.0 - sum_diff / a.0.len() as f64
}

/// The other version most similar to `versions[reference]`. Ties keep the
/// earliest candidate.
pub fn most_similar(reference: usize, versions: &[PromptVersion]) -> Option<SimilarMatch> {
    let target = metric_vector(versions.get(reference))?;

    let mut best: Option<SimilarMatch> = None;
    for (index, version) in versions.iter().enumerate() {
        if index == reference {
            continue;
        }
        let Some(vector) = metric_vector(Some(version)) else {
            continue;
        };
        let sim = similarity(&target, &vector);
        if best.map_or(true, |b| sim > b.similarity) {
            best = Some(SimilarMatch {
                index,
                similarity: sim,
            });
        }
    }
    best
}

// =============================================================================
// Deltas
// =============================================================================

/// What got better from `previous` to `next`: newly added constraints, then
/// metrics that rose by more than [`IMPROVEMENT_THRESHOLD`].
///
/// Removed constraints and regressions are not reported.
pub fn improvements(previous: &PromptVersion, next: &PromptVersion) -> Vec<String> {
    let prev = previous.analysis();
    let cur = next.analysis();
    let mut out = Vec::new();

    for key in ConstraintKey::ALL {
        if cur.constraints.get(key) && !prev.constraints.get(key) {
            out.push(format!("Added {} constraint", key.as_str()));
        }
    }

    for key in MetricKey::ALL {
        let delta = cur.metrics.get(key) - prev.metrics.get(key);
        if exceeds_threshold(delta) {
            out.push(format!("Improved {}", key.as_str()));
        }
    }

    out
}

fn exceeds_threshold(delta: f64) -> bool {
    delta - IMPROVEMENT_THRESHOLD > THRESHOLD_TOLERANCE
}

/// Per-metric display row: current percent and the signed change from the
/// previous version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricChange {
    pub metric: MetricKey,
    pub value: f64,
    pub percent: i64,
    /// Rounded percentage-point change; `None` without a previous version or
    /// when it rounds to zero.
    pub change: Option<i64>,
}

impl MetricChange {
    pub fn arrow(&self) -> Option<&'static str> {
        self.change.map(|c| if c > 0 { "▲" } else { "▼" })
    }
}

pub fn metric_changes(previous: Option<&PromptVersion>, current: &PromptVersion) -> Vec<MetricChange> {
    let metrics = &current.analysis().metrics;
    MetricKey::ALL
        .iter()
        .map(|&metric| {
            let value = metrics.get(metric);
            let change = previous
                .map(|p| to_percent(value - p.analysis().metrics.get(metric)))
                .filter(|c| *c != 0);
            MetricChange {
                metric,
                value,
                percent: to_percent(value),
                change,
            }
        })
        .collect()
}

fn to_percent(x: f64) -> i64 {
    (x * 100.0).round() as i64
}
