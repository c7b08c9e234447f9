//! Session state: the version history, the active selection, and the
//! submit flow against an analyzer.

use thiserror::Error;

use crate::card::{timeline, TimelineEntry, VersionCard};
use crate::gateway::{AnalyzerError, PromptAnalyzer, PromptText};
use crate::graph::{GraphCache, GraphLayout, PromptGraph};
use crate::history::{History, Selection};
use crate::model::PromptVersion;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The submission was not analyzed; history is unchanged.
    #[error("analysis failed")]
    AnalysisFailed(#[source] AnalyzerError),

    #[error("rewrite failed")]
    RewriteFailed(#[source] AnalyzerError),

    #[error("refine failed")]
    RefineFailed(#[source] AnalyzerError),
}

pub struct Session<A: PromptAnalyzer> {
    analyzer: A,
    history: History,
    selection: Selection,
    graph: GraphCache,
}

impl<A: PromptAnalyzer> Session<A> {
    pub fn new(analyzer: A) -> Self {
        Self::with_layout(analyzer, GraphLayout::default())
    }

    pub fn with_layout(analyzer: A, layout: GraphLayout) -> Self {
        Self {
            analyzer,
            history: History::new(),
            selection: Selection::default(),
            graph: GraphCache::new(layout),
        }
    }

    /// Analyze `text` and append it as a new version, selecting it.
    ///
    /// On failure nothing changes: no version is appended and the selection
    /// stays where it was.
    pub async fn submit(&mut self, text: &str) -> Result<&PromptVersion, SessionError> {
        let analysis = self
            .analyzer
            .analyze(text)
            .await
            .map_err(SessionError::AnalysisFailed)?;

        self.history.push(PromptVersion::new(text, analysis));
        self.selection = Selection::latest(self.history.len());
        tracing::debug!(versions = self.history.len(), "appended prompt version");

        // Just pushed, so the history is non-empty.
        let last = self.history.len() - 1;
        Ok(&self.history.versions()[last])
    }

    pub async fn rewrite(&self, text: &str) -> Result<PromptText, SessionError> {
        self.analyzer
            .rewrite(text)
            .await
            .map_err(SessionError::RewriteFailed)
    }

    pub async fn refine(&self, text: &str) -> Result<PromptText, SessionError> {
        self.analyzer
            .refine(text)
            .await
            .map_err(SessionError::RefineFailed)
    }

    /// Snapshot of the history; later submissions do not affect it.
    pub fn history(&self) -> History {
        self.history.clone()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&PromptVersion> {
        self.history.get(self.selection.index())
    }

    pub fn select(&mut self, index: usize) {
        self.selection = Selection::clamped(index, self.history.len());
    }

    pub fn select_previous(&mut self) {
        self.selection = self.selection.previous(self.history.len());
    }

    pub fn select_next(&mut self) {
        self.selection = self.selection.next(self.history.len());
    }

    /// Drop every version.
    pub fn clear(&mut self) {
        self.history = History::new();
        self.selection = Selection::default();
    }

    pub fn card(&self) -> Option<VersionCard> {
        VersionCard::build(&self.history, self.selection.index())
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        timeline(&self.history, self.selection)
    }

    pub fn graph(&mut self) -> std::sync::Arc<PromptGraph> {
        self.graph.get(&self.history)
    }
}
