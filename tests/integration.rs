//! Integration tests for the lendwise library.
//!
//! These tests exercise the shipped demo artifact end to end: load, encode,
//! score, and the session built on top.

use std::path::PathBuf;

use lendwise::artifact::ModelArtifact;
use lendwise::classifier::AdapterCell;
use lendwise::encoder::FeatureEncoder;
use lendwise::prelude::*;
use lendwise::tree::{GradientBoostingClassifier, RegressionTreeNode};
use tempfile::TempDir;

fn demo_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/gb_model.json")
}

fn scenario_a() -> ApplicantInput {
    ApplicantInput {
        age: 30,
        income: 60_000.0,
        employment_experience: 8,
        loan_amount: 15_000.0,
        ..ApplicantInput::default()
    }
}

fn negate(tree: &RegressionTreeNode) -> RegressionTreeNode {
    match tree {
        RegressionTreeNode::Leaf(leaf) => RegressionTreeNode::leaf(-leaf.value),
        RegressionTreeNode::Node(node) => RegressionTreeNode::split(
            node.feature_idx,
            node.threshold,
            negate(&node.left),
            negate(&node.right),
        ),
    }
}

#[test]
fn test_demo_artifact_matches_trained_schema() {
    let adapter = ClassifierAdapter::load(demo_model(), 1).expect("demo artifact loads");
    let trained = FeatureSchema::trained();
    assert_eq!(
        adapter.schema().names().collect::<Vec<_>>(),
        trained.names().collect::<Vec<_>>()
    );
    assert_eq!(adapter.schema().unknown_columns().count(), 0);
}

#[test]
fn test_scenario_a_end_to_end() {
    let adapter = ClassifierAdapter::load(demo_model(), 1).expect("demo artifact loads");
    let input = scenario_a();
    validate(&input, &ValidationPolicy::default()).expect("scenario A is valid");

    let (features, report) = FeatureEncoder::new().encode_with_report(&input, adapter.schema());
    assert!(report.is_exact());
    assert_eq!(features.len(), 27);
    assert_eq!(features.get("loan_percent_income"), Some(0.25));

    let result = adapter.predict(&features).expect("scores");
    assert_eq!(result.label, Verdict::Approved);
    assert!((result.probability_approved - 0.7473).abs() < 1e-3);
    assert_eq!(result.approval_percent(), "74.73%");
}

#[test]
fn test_previous_defaults_reject() {
    let adapter = ClassifierAdapter::load(demo_model(), 1).expect("demo artifact loads");
    let input = ApplicantInput {
        previous_defaults: true,
        ..scenario_a()
    };
    let result = adapter.predict(&encode(&input, adapter.schema())).expect("scores");
    assert_eq!(result.label, Verdict::Rejected);
    assert!(result.probability_rejected > 0.9);
}

#[test]
fn test_binary_artifact_scores_like_json() {
    let dir = TempDir::new().expect("tempdir");
    let bin_path = dir.path().join("gb_model.bin");
    ModelArtifact::load(demo_model())
        .expect("demo artifact loads")
        .save(&bin_path)
        .expect("save bincode");

    let json = ClassifierAdapter::load(demo_model(), 1).expect("json");
    let bin = ClassifierAdapter::load(&bin_path, 1).expect("bincode");
    assert_eq!(bin.artifact_summary().format.to_string(), "binary");

    for input in [
        scenario_a(),
        ApplicantInput {
            previous_defaults: true,
            ..scenario_a()
        },
        ApplicantInput::default(),
    ] {
        let a = json.predict(&encode(&input, json.schema())).expect("json scores");
        let b = bin.predict(&encode(&input, bin.schema())).expect("bin scores");
        assert_eq!(a, b);
    }
}

#[test]
fn test_reversed_class_order_gives_same_verdicts() {
    let mut artifact = ModelArtifact::load(demo_model()).expect("demo artifact loads");
    let forward =
        ClassifierAdapter::from_artifact(artifact.clone(), 1, "forward.json").expect("forward");

    artifact.classes = vec![1, 0];
    artifact.model = GradientBoostingClassifier::new(
        -artifact.model.init_prediction(),
        artifact.model.learning_rate(),
        artifact.model.estimators().iter().map(negate).collect(),
    );
    let reversed =
        ClassifierAdapter::from_artifact(artifact, 1, "reversed.json").expect("reversed");

    for input in [
        scenario_a(),
        ApplicantInput {
            previous_defaults: true,
            ..scenario_a()
        },
        ApplicantInput {
            credit_score: 500,
            interest_rate: 20.0,
            ..scenario_a()
        },
    ] {
        let a = forward.predict(&encode(&input, forward.schema())).expect("scores");
        let b = reversed.predict(&encode(&input, reversed.schema())).expect("scores");
        assert_eq!(a.label, b.label);
        assert!((a.probability_approved - b.probability_approved).abs() < 1e-12);
    }
}

#[test]
fn test_vocabulary_drift_zeroes_signal_without_error() {
    let mut artifact = ModelArtifact::load(demo_model()).expect("demo artifact loads");
    for name in &mut artifact.feature_names {
        if name == "person_home_ownership_RENT" {
            *name = "person_home_ownership_RENTED".to_string();
        }
    }
    let adapter =
        ClassifierAdapter::from_artifact(artifact, 1, "drifted.json").expect("still loads");

    let input = scenario_a();
    let (features, report) = FeatureEncoder::new().encode_with_report(&input, adapter.schema());
    assert_eq!(features.get("person_home_ownership_RENTED"), Some(0.0));
    assert_eq!(report.zero_filled, vec!["person_home_ownership_RENTED".to_string()]);
    assert!(report.lost_signal.contains(&"person_home_ownership_RENT".to_string()));
    assert!(adapter.predict(&features).is_ok());
}

#[test]
fn test_session_scenario_d_with_demo_model() {
    let adapter = ClassifierAdapter::load(demo_model(), 1).expect("demo artifact loads");
    let mut session = PredictionSession::new(adapter);
    session.set_input(scenario_a());
    session.submit().expect("scores");
    assert_eq!(session.phase(), SessionPhase::Scored);

    session.reset();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.result().is_none());
    assert_eq!(session.input(), &ApplicantInput::default());
}

#[test]
fn test_sessions_share_one_adapter() {
    let cell = AdapterCell::new();
    let adapter = cell.get_or_load(demo_model(), 1).expect("loads");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let adapter = adapter.clone();
            std::thread::spawn(move || {
                let mut session = PredictionSession::new(adapter);
                session.set_input(ApplicantInput {
                    previous_defaults: i % 2 == 1,
                    ..scenario_a()
                });
                session.submit().expect("scores").label
            })
        })
        .collect();

    let labels: Vec<Verdict> = handles.into_iter().map(|h| h.join().expect("thread")).collect();
    assert_eq!(
        labels,
        vec![Verdict::Approved, Verdict::Rejected, Verdict::Approved, Verdict::Rejected]
    );
}

#[test]
fn test_shared_adapter_from_config() {
    let config = LendConfig {
        artifact_path: demo_model(),
        ..LendConfig::default()
    };
    let first = shared_adapter(&config).expect("loads");
    let second = shared_adapter(&config).expect("cached");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_default_artifact_path_is_the_shipped_model() {
    let default = LendConfig::default().artifact_path;
    let resolved = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(&default);
    assert_eq!(resolved, demo_model());
    let adapter = ClassifierAdapter::load(resolved, 1).expect("default artifact loads");
    assert_eq!(adapter.schema().len(), 27);
}

#[test]
fn test_unlisted_approved_class_is_fatal() {
    let err = ClassifierAdapter::load(demo_model(), 2).unwrap_err();
    assert!(matches!(err, LendError::ArtifactCorrupt { .. }));
    assert!(err.is_fatal());
}
