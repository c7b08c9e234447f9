#![forbid(unsafe_code)]

//! # promptflow
//!
//! Track, compare, and visualize successive versions of a research prompt.
//!
//! Each submitted prompt is scored by an external analysis service along four
//! metrics (depth, breadth, coherence, relevance) and three constraints
//! (evidence, scope, comparisons). From the resulting append-only history this
//! crate derives:
//!
//! - the best version so far (highest mean metric),
//! - the most similar other version (L1 distance over metrics),
//! - improvement labels between consecutive versions,
//! - a node/edge graph with deterministic layout for a graph renderer.
//!
//! Derivations are pure functions of the history; nothing derived is stored as
//! a source of truth.

pub mod card;
pub mod compare;
pub mod gateway;
pub mod graph;
pub mod history;
pub mod model;
pub mod session;

pub use card::{render_card_markdown, timeline, TimelineEntry, VersionCard};
pub use compare::{
    best_version, improvements, metric_vector, most_similar, similarity, BestVersion,
    MetricVector, SimilarMatch, IMPROVEMENT_THRESHOLD,
};
pub use gateway::{
    AnalyzerConfig, AnalyzerError, AnalyzerGateway, HttpAnalyzer, NoopUsageSink, PromptAnalyzer,
    TracingUsageSink, UsageSink,
};
pub use graph::{build_graph, GraphCache, GraphLayout, PromptGraph};
pub use history::{History, Selection};
pub use model::{
    ConstraintKey, Constraints, Intent, MetricKey, Metrics, PromptAnalysis, PromptVersion,
};
pub use session::{Session, SessionError};
