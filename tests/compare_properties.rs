use promptflow::compare::{
    best_version, improvements, metric_vector, most_similar, similarity,
};
use promptflow::{Constraints, History, Metrics, PromptAnalysis, PromptVersion, VersionCard};

fn version(id: &str, constraints: Constraints, metrics: Metrics) -> PromptVersion {
    PromptVersion::with_id(
        id,
        format!("prompt {id}"),
        PromptAnalysis {
            constraints,
            metrics,
            ..Default::default()
        },
    )
}

fn metrics_only(id: &str, m: [f64; 4]) -> PromptVersion {
    version(id, Constraints::default(), Metrics::new(m[0], m[1], m[2], m[3]))
}

fn sample_history() -> Vec<PromptVersion> {
    vec![
        metrics_only("a", [0.3, 0.6, 0.5, 0.5]),
        metrics_only("b", [0.6, 0.5, 0.6, 0.7]),
        metrics_only("c", [0.8, 0.7, 0.8, 0.85]),
        metrics_only("d", [0.1, 0.9, 0.2, 0.4]),
    ]
}

#[test]
fn best_score_is_the_maximum_mean() {
    let history = sample_history();
    let best = best_version(&history).unwrap();

    let means: Vec<f64> = history
        .iter()
        .map(|v| metric_vector(Some(v)).unwrap().mean())
        .collect();
    let max = means.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(best.index, 2);
    assert_eq!(best.score, max);
    assert!(means.iter().all(|m| *m <= best.score));
    assert_eq!(best.percent(), 79);
}

#[test]
fn single_entry_is_trivially_best() {
    let history = vec![metrics_only("only", [0.0, 0.0, 0.0, 0.0])];
    let best = best_version(&history).unwrap();
    assert_eq!(best.index, 0);
    assert_eq!(best.score, 0.0);
}

#[test]
fn raw_similarity_is_direction_independent() {
    let history = sample_history();
    for a in &history {
        for b in &history {
            let va = metric_vector(Some(a)).unwrap();
            let vb = metric_vector(Some(b)).unwrap();
            assert_eq!(similarity(&va, &vb), similarity(&vb, &va));
        }
    }
}

#[test]
fn most_similar_picks_closest_other_version() {
    let history = sample_history();
    let m = most_similar(1, &history).unwrap();
    // b vs a: 0.7/4, b vs c: 0.75/4, b vs d: 1.6/4
    assert_eq!(m.index, 0);
    assert!((m.similarity - (1.0 - 0.7 / 4.0)).abs() < 1e-9);
}

#[test]
fn delta_reports_only_gains() {
    let previous = version(
        "prev",
        Constraints {
            evidence: false,
            ..Default::default()
        },
        Metrics::new(0.5, 0.0, 0.0, 0.0),
    );
    let next = version(
        "next",
        Constraints {
            evidence: true,
            ..Default::default()
        },
        Metrics::new(0.4, 0.0, 0.0, 0.0),
    );

    let labels = improvements(&previous, &next);
    assert_eq!(labels, vec!["Added evidence constraint"]);
    assert!(!labels.iter().any(|l| l.contains("depth")));
}

#[test]
fn removed_constraints_are_not_reported() {
    let previous = version(
        "prev",
        Constraints {
            evidence: true,
            scope: true,
            comparisons: true,
        },
        Metrics::default(),
    );
    let next = version("next", Constraints::default(), Metrics::default());
    assert!(improvements(&previous, &next).is_empty());
}

#[test]
fn improvement_threshold_is_strict() {
    let base = metrics_only("base", [0.5, 0.5, 0.5, 0.5]);

    let exact = metrics_only("exact", [0.6, 0.5, 0.5, 0.5]);
    assert!(improvements(&base, &exact).is_empty());

    let above = metrics_only("above", [0.6001, 0.5, 0.5, 0.5]);
    assert_eq!(improvements(&base, &above), vec!["Improved depth"]);
}

#[test]
fn improvements_follow_key_order() {
    let previous = metrics_only("prev", [0.1, 0.1, 0.1, 0.1]);
    let next = version(
        "next",
        Constraints {
            evidence: true,
            scope: true,
            comparisons: true,
        },
        Metrics::new(0.9, 0.9, 0.9, 0.9),
    );
    assert_eq!(
        improvements(&previous, &next),
        vec![
            "Added evidence constraint",
            "Added scope constraint",
            "Added comparisons constraint",
            "Improved depth",
            "Improved breadth",
            "Improved coherence",
            "Improved relevance",
        ]
    );
}

#[test]
fn empty_history_has_no_best_and_no_match() {
    assert!(best_version(&[]).is_none());
    assert!(most_similar(0, &[]).is_none());
}

#[test]
fn out_of_range_history_document_stays_in_domain() {
    let raw = r#"[
        {"id": "a", "text": "a", "analysis": {"metrics": {"depth": 5.0, "breadth": 5.0, "coherence": 5.0, "relevance": 5.0}}},
        {"id": "b", "text": "b", "analysis": {"metrics": {"depth": -2.0, "breadth": 5.0, "coherence": 5.0, "relevance": 5.0}}}
    ]"#;
    let history: History = serde_json::from_str(raw).unwrap();

    let best = best_version(history.versions()).unwrap();
    assert_eq!(best.index, 0);
    assert_eq!(best.score, 1.0);
    assert_eq!(best.percent(), 100);

    let m = most_similar(0, history.versions()).unwrap();
    assert_eq!(m.similarity, 0.75);
    assert!((-3.0..=1.0).contains(&m.similarity));

    let card = VersionCard::build(&history, 1).unwrap();
    assert_eq!(card.metrics[0].percent, 0);
    assert!(card.metrics.iter().all(|row| (0..=100).contains(&row.percent)));
}
