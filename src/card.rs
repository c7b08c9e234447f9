//! Per-version card and timeline views, plus markdown rendering.

use serde::Serialize;

use crate::compare::{best_version, improvements, metric_changes, most_similar, MetricChange};
use crate::history::{History, Selection};
use crate::model::{ConstraintKey, Intent};

#[derive(Debug, Clone, Serialize)]
pub struct BestBadge {
    pub index: usize,
    pub percent: i64,
    /// Whether the carded version is itself the best.
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarBadge {
    pub index: usize,
    pub similarity: f64,
    pub percent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintFlag {
    pub constraint: ConstraintKey,
    pub present: bool,
}

/// Everything the version card shows, as data.
#[derive(Debug, Clone, Serialize)]
pub struct VersionCard {
    pub index: usize,
    pub total: usize,
    pub id: String,
    pub text: String,
    pub intent: Intent,
    pub best: Option<BestBadge>,
    pub similar: Option<SimilarBadge>,
    pub metrics: Vec<MetricChange>,
    pub constraints: Vec<ConstraintFlag>,
    pub suggestions: Vec<String>,
    /// Improvements over the previous version; empty for the first.
    pub improvements: Vec<String>,
}

impl VersionCard {
    /// Card for `history[index]`, or `None` when out of range.
    pub fn build(history: &History, index: usize) -> Option<Self> {
        let versions = history.versions();
        let version = versions.get(index)?;
        let previous = index.checked_sub(1).and_then(|i| versions.get(i));
        let analysis = version.analysis();

        let best = best_version(versions).map(|b| BestBadge {
            index: b.index,
            percent: b.percent(),
            is_current: b.index == index,
        });

        // A negative match is not worth showing.
        let similar = most_similar(index, versions)
            .filter(|m| m.similarity >= 0.0)
            .map(|m| SimilarBadge {
                index: m.index,
                similarity: m.similarity,
                percent: m.percent(),
            });

        Some(Self {
            index,
            total: versions.len(),
            id: version.id().to_string(),
            text: version.text().to_string(),
            intent: analysis.intent,
            best,
            similar,
            metrics: metric_changes(previous, version),
            constraints: ConstraintKey::ALL
                .iter()
                .map(|&constraint| ConstraintFlag {
                    constraint,
                    present: analysis.constraints.get(constraint),
                })
                .collect(),
            suggestions: analysis.suggestions.clone(),
            improvements: previous
                .map(|p| improvements(p, version))
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub index: usize,
    pub label: String,
    pub active: bool,
}

pub fn timeline(history: &History, selection: Selection) -> Vec<TimelineEntry> {
    (0..history.len())
        .map(|index| TimelineEntry {
            index,
            label: format!("v{}", index + 1),
            active: index == selection.index(),
        })
        .collect()
}

pub fn render_card_markdown(card: &VersionCard) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Version {} of {} ({})\n\n",
        card.index + 1,
        card.total,
        card.intent.as_str()
    ));

    if let Some(best) = &card.best {
        if best.is_current {
            out.push_str(&format!(
                "- Best version so far (score {}%)\n",
                best.percent
            ));
        } else {
            out.push_str(&format!(
                "- Best so far: v{} (score {}%)\n",
                best.index + 1,
                best.percent
            ));
        }
    }
    if let Some(similar) = &card.similar {
        out.push_str(&format!(
            "- Most similar to v{} ({}% match)\n",
            similar.index + 1,
            similar.percent
        ));
    }

    out.push_str("\n## Prompt\n\n");
    out.push_str(&format!("> {}\n", card.text));

    out.push_str("\n## Quality Metrics\n\n");
    for row in &card.metrics {
        out.push_str(&format!("- {}: {}%", row.metric.as_str(), row.percent));
        if let (Some(arrow), Some(change)) = (row.arrow(), row.change) {
            out.push_str(&format!(" {arrow} {change:+}"));
        }
        out.push('\n');
    }

    out.push_str("\n## Constraints\n\n");
    for flag in &card.constraints {
        let mark = if flag.present { "x" } else { " " };
        out.push_str(&format!("- [{mark}] {}\n", flag.constraint.as_str()));
    }

    if !card.improvements.is_empty() {
        out.push_str("\n## Improvements\n\n");
        for line in &card.improvements {
            out.push_str(&format!("- {line}\n"));
        }
    }

    if !card.suggestions.is_empty() {
        out.push_str("\n## Suggestions for Refinement\n\n");
        for s in &card.suggestions {
            out.push_str(&format!("- {s}\n"));
        }
    }

    out
}
