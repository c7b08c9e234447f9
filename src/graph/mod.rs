//! Graph derivation for the prompt-flow view.
//!
//! The graph is a pure function of the history: version nodes on one row,
//! deduplicated suggestion nodes on the row below, refinement edges between
//! consecutive versions, and version→suggestion edges.

pub mod builder;
pub mod category;
pub mod types;

use std::sync::Arc;

use crate::history::{History, HistoryStamp};

pub use builder::{build_graph, suggestion_node_id, version_node_id};
pub use category::{normalize_category, normalize_suggestion, suggestion_category};
pub use types::*;

/// Memoizes the last derived graph, keyed by history identity.
#[derive(Debug, Default)]
pub struct GraphCache {
    layout: GraphLayout,
    last: Option<(HistoryStamp, Arc<PromptGraph>)>,
}

impl GraphCache {
    pub fn new(layout: GraphLayout) -> Self {
        Self { layout, last: None }
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    /// Graph for `history`, rebuilt only when the history changed since the
    /// last call.
    pub fn get(&mut self, history: &History) -> Arc<PromptGraph> {
        if let Some((stamp, graph)) = &self.last {
            if stamp.matches(history) {
                return Arc::clone(graph);
            }
        }
        tracing::debug!(versions = history.len(), "rebuilding prompt graph");
        let graph = Arc::new(build_graph(history, &self.layout));
        self.last = Some((history.stamp(), Arc::clone(&graph)));
        graph
    }
}
