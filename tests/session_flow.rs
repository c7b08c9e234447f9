use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use promptflow::gateway::{AnalyzerError, PromptAnalyzer, PromptText};
use promptflow::{Constraints, Metrics, PromptAnalysis, Session, SessionError};

/// Replays canned analysis results in order.
struct ScriptedAnalyzer {
    script: Mutex<VecDeque<Result<PromptAnalysis, AnalyzerError>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAnalyzer {
    fn new(script: Vec<Result<PromptAnalysis, AnalyzerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl PromptAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, AnalyzerError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AnalyzerError::malformed("script exhausted")))
    }

    async fn rewrite(&self, prompt: &str) -> Result<PromptText, AnalyzerError> {
        Ok(PromptText {
            text: format!("rewritten: {prompt}"),
            usage: None,
        })
    }

    async fn refine(&self, _prompt: &str) -> Result<PromptText, AnalyzerError> {
        Err(AnalyzerError::Status {
            status: 500,
            message: "refine unavailable".to_string(),
            context: Default::default(),
        })
    }
}

fn analysis(metrics: [f64; 4], constraints: Constraints, suggestions: &[&str]) -> PromptAnalysis {
    PromptAnalysis {
        constraints,
        metrics: Metrics::new(metrics[0], metrics[1], metrics[2], metrics[3]),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn three_good_results() -> Vec<Result<PromptAnalysis, AnalyzerError>> {
    vec![
        Ok(analysis(
            [0.3, 0.6, 0.5, 0.5],
            Constraints {
                scope: true,
                ..Default::default()
            },
            &["Add evidence requirements"],
        )),
        Ok(analysis(
            [0.6, 0.5, 0.6, 0.7],
            Constraints {
                evidence: true,
                scope: true,
                comparisons: false,
            },
            &["Add evidence requirements"],
        )),
        Ok(analysis(
            [0.8, 0.7, 0.8, 0.85],
            Constraints {
                evidence: true,
                scope: true,
                comparisons: true,
            },
            &[],
        )),
    ]
}

#[tokio::test]
async fn submit_appends_and_selects_newest() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    assert!(session.is_empty());
    assert!(session.card().is_none());

    let first = session.submit("first prompt").await.unwrap();
    assert_eq!(first.text(), "first prompt");
    assert_eq!(session.selection().index(), 0);

    session.submit("second prompt").await.unwrap();
    session.submit("third prompt").await.unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.selection().index(), 2);
    assert_eq!(session.selected().unwrap().text(), "third prompt");
}

#[tokio::test]
async fn failed_submission_leaves_state_unchanged() {
    let script = vec![
        Ok(analysis([0.5; 4], Constraints::default(), &[])),
        Err(AnalyzerError::malformed("missing `result`")),
    ];
    let mut session = Session::new(ScriptedAnalyzer::new(script));

    session.submit("good").await.unwrap();
    let before = session.history();

    let err = session.submit("bad").await.unwrap_err();
    assert!(matches!(err, SessionError::AnalysisFailed(_)));

    assert_eq!(session.len(), 1);
    assert_eq!(session.selection().index(), 0);
    assert_eq!(
        session.history().fingerprint().unwrap(),
        before.fingerprint().unwrap()
    );
}

#[tokio::test]
async fn history_snapshot_is_not_affected_by_later_submissions() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    session.submit("one").await.unwrap();

    let snapshot = session.history();
    session.submit("two").await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn navigation_clamps_at_both_ends() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    for text in ["a", "b", "c"] {
        session.submit(text).await.unwrap();
    }

    session.select_next();
    assert_eq!(session.selection().index(), 2);

    session.select_previous();
    session.select_previous();
    session.select_previous();
    assert_eq!(session.selection().index(), 0);

    session.select(99);
    assert_eq!(session.selection().index(), 2);
}

#[tokio::test]
async fn card_and_timeline_follow_selection() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    for text in ["a", "b", "c"] {
        session.submit(text).await.unwrap();
    }

    session.select(1);
    let card = session.card().unwrap();
    assert_eq!(card.index, 1);
    assert_eq!(card.total, 3);
    assert_eq!(card.text, "b");
    assert_eq!(
        card.improvements,
        vec![
            "Added evidence constraint",
            "Improved depth",
            "Improved relevance"
        ]
    );
    let best = card.best.unwrap();
    assert_eq!(best.index, 2);
    assert!(!best.is_current);

    let timeline = session.timeline();
    assert_eq!(timeline.len(), 3);
    assert_eq!(
        timeline.iter().filter(|e| e.active).map(|e| e.index).collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(timeline[2].label, "v3");
}

#[tokio::test]
async fn graph_is_memoized_until_history_changes() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    session.submit("a").await.unwrap();
    session.submit("b").await.unwrap();

    let g1 = session.graph();
    let g2 = session.graph();
    assert!(Arc::ptr_eq(&g1, &g2));
    // Shared suggestion collapses into one node.
    assert_eq!(g1.suggestion_nodes().count(), 1);

    session.submit("c").await.unwrap();
    let g3 = session.graph();
    assert!(!Arc::ptr_eq(&g1, &g3));
    assert!(g3.node("prompt-2").is_some());
}

#[tokio::test]
async fn clear_empties_everything() {
    let mut session = Session::new(ScriptedAnalyzer::new(three_good_results()));
    session.submit("a").await.unwrap();
    session.clear();

    assert!(session.is_empty());
    assert!(session.selected().is_none());
    assert!(session.timeline().is_empty());
    assert!(session.graph().is_empty());
}

#[tokio::test]
async fn rewrite_and_refine_errors_are_wrapped() {
    let session = Session::new(ScriptedAnalyzer::new(Vec::new()));

    let rewritten = session.rewrite("draft").await.unwrap();
    assert_eq!(rewritten.text, "rewritten: draft");

    let err = session.refine("draft").await.unwrap_err();
    assert!(matches!(err, SessionError::RefineFailed(_)));
    assert!(session.is_empty());
}

#[tokio::test]
async fn each_submission_reaches_the_analyzer_once() {
    let analyzer = ScriptedAnalyzer::new(three_good_results());
    let calls = analyzer.calls.clone();
    let mut session = Session::new(analyzer);

    session.submit("a").await.unwrap();
    session.submit("b").await.unwrap();

    assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
}
