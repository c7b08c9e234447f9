//! History → graph derivation.

use std::collections::HashMap;

use crate::compare::{improvements, metric_vector};
use crate::history::History;

use super::category::{normalize_category, normalize_suggestion, suggestion_category};
use super::types::{
    EdgeData, GraphEdge, GraphLayout, GraphNode, NodeCategory, NodeData, Position, PromptGraph,
};

/// One deduplicated suggestion, keyed by its normalized text.
struct SuggestionSlot {
    label: String,
    referenced_by: Vec<usize>,
}

/// A (version, suggestion) link in first-seen order.
struct SuggestionLink {
    version: usize,
    slot: usize,
    text: String,
}

pub fn version_node_id(index: usize) -> String {
    format!("prompt-{index}")
}

pub fn suggestion_node_id(slot: usize) -> String {
    format!("suggestion-{slot}")
}

/// Derive the full node/edge set from `history`.
///
/// The output depends only on the history contents and `layout`: same input,
/// same ids, positions and edge order.
pub fn build_graph(history: &History, layout: &GraphLayout) -> PromptGraph {
    let versions = history.versions();
    if versions.is_empty() {
        return PromptGraph::default();
    }

    let x_of = |index: usize| index as f64 * layout.horizontal_spacing;

    let mut nodes = Vec::with_capacity(versions.len());
    let mut edges = Vec::new();

    for (i, version) in versions.iter().enumerate() {
        let score = metric_vector(Some(version)).map_or(0.0, |v| v.mean());
        nodes.push(GraphNode {
            id: version_node_id(i),
            position: Position {
                x: x_of(i),
                y: layout.version_row_y,
            },
            data: NodeData::Version {
                label: format!("v{}", i + 1),
                text: version.text().to_string(),
                intent: version.analysis().intent,
                score,
            },
            category: NodeCategory::Prompt(normalize_category(version.text())),
            step: i,
        });
    }

    for (i, pair) in versions.windows(2).enumerate() {
        let labels = improvements(&pair[0], &pair[1]);
        edges.push(GraphEdge {
            id: format!("e-{}-{}", i, i + 1),
            source: version_node_id(i),
            target: version_node_id(i + 1),
            label: (!labels.is_empty()).then(|| labels.join(", ")),
            data: EdgeData {
                improvements: Some(labels),
                suggestion: None,
            },
            step: i + 1,
        });
    }

    let (slots, links) = collect_suggestions(history);

    for (k, slot) in slots.iter().enumerate() {
        let mean_index =
            slot.referenced_by.iter().sum::<usize>() as f64 / slot.referenced_by.len() as f64;
        nodes.push(GraphNode {
            id: suggestion_node_id(k),
            position: Position {
                x: mean_index * layout.horizontal_spacing,
                y: layout.suggestion_row_y,
            },
            data: NodeData::Suggestion {
                label: slot.label.clone(),
                referenced_by: slot.referenced_by.clone(),
            },
            category: NodeCategory::Suggestion(suggestion_category(&slot.label)),
            step: slot.referenced_by[0],
        });
    }

    for link in links {
        let category = suggestion_category(&link.text);
        edges.push(GraphEdge {
            id: format!("s-{}-{}", link.version, link.slot),
            source: version_node_id(link.version),
            target: suggestion_node_id(link.slot),
            label: Some(category.as_str().to_string()),
            data: EdgeData {
                improvements: None,
                suggestion: Some(link.text),
            },
            step: link.version,
        });
    }

    PromptGraph { nodes, edges }
}

/// Single pass over all suggestions: dedup by normalized text, record which
/// versions reference each one (at most once per version).
fn collect_suggestions(history: &History) -> (Vec<SuggestionSlot>, Vec<SuggestionLink>) {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut slots: Vec<SuggestionSlot> = Vec::new();
    let mut links = Vec::new();

    for (i, version) in history.versions().iter().enumerate() {
        for raw in &version.analysis().suggestions {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            let slot = *by_key.entry(normalize_suggestion(text)).or_insert_with(|| {
                slots.push(SuggestionSlot {
                    label: text.to_string(),
                    referenced_by: Vec::new(),
                });
                slots.len() - 1
            });

            let refs = &mut slots[slot].referenced_by;
            if refs.last() == Some(&i) {
                continue;
            }
            refs.push(i);
            links.push(SuggestionLink {
                version: i,
                slot,
                text: text.to_string(),
            });
        }
    }

    (slots, links)
}
