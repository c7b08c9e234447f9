//! Node and edge shapes handed to the graph renderer.

use serde::Serialize;

use crate::model::Intent;

/// Layout constants for the version/suggestion rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLayout {
    /// Horizontal distance between consecutive versions.
    pub horizontal_spacing: f64,
    pub version_row_y: f64,
    pub suggestion_row_y: f64,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            horizontal_spacing: 200.0,
            version_row_y: 0.0,
            suggestion_row_y: 160.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Classification of a prompt version by its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Comparison,
    Evidence,
    Scope,
    Exploration,
}

/// Coarse category of a suggestion, used as its edge label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Evidence,
    Comparison,
    Depth,
    Breadth,
    Scope,
    Suggestion,
}

impl SuggestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::Evidence => "evidence",
            SuggestionCategory::Comparison => "comparison",
            SuggestionCategory::Depth => "depth",
            SuggestionCategory::Breadth => "breadth",
            SuggestionCategory::Scope => "scope",
            SuggestionCategory::Suggestion => "suggestion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeCategory {
    Prompt(PromptCategory),
    Suggestion(SuggestionCategory),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeData {
    Version {
        label: String,
        text: String,
        intent: Intent,
        /// Mean of the four metrics.
        score: f64,
    },
    Suggestion {
        label: String,
        /// Version indices that list this suggestion, ascending.
        referenced_by: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
    pub category: NodeCategory,
    pub step: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EdgeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: EdgeData,
    pub step: usize,
}

/// Derived view of a history. Holds no state of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PromptGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl PromptGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn suggestion_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.data, NodeData::Suggestion { .. }))
    }
}
