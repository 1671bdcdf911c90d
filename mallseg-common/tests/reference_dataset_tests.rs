//! Tests against the bundled reference dataset (data/mall_customers.csv)
//!
//! Tests cover:
//! - The shipped file matches the expected schema
//! - Five- and six-cluster ids line up with the action tables' wording
//! - Six-cluster predictions honour the remap of cluster 4
//! - Startup fit is reproducible

use std::path::PathBuf;

use mallseg_common::classifier::{
    ClusterOptions, FittedClassifier, REMAP_SOURCE, REMAP_SPENDING_THRESHOLD, REMAP_TARGET,
};
use mallseg_common::dataset::{load_reference_dataset, ReferencePoint};
use mallseg_common::{build_classifier, Revision, SegmentClassifier, SegmentId};

fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("data")
        .join("mall_customers.csv")
}

fn reference() -> Vec<ReferencePoint> {
    load_reference_dataset(&dataset_path()).expect("Bundled dataset should load")
}

#[test]
fn test_bundled_dataset_loads() {
    let points = reference();
    assert_eq!(points.len(), 200);
    assert!(points.iter().all(|p| (0.0..=150.0).contains(&p.income)));
    assert!(points.iter().all(|p| (0.0..=100.0).contains(&p.spending_score)));
}

#[test]
fn test_five_clusters_match_action_wording() {
    let classifier =
        FittedClassifier::fit(Revision::Kmeans5, &reference(), ClusterOptions::default()).unwrap();

    assert_eq!(classifier.classify(25.0, 20.0), SegmentId(0));
    assert_eq!(classifier.classify(25.0, 80.0), SegmentId(1));
    assert_eq!(classifier.classify(55.0, 50.0), SegmentId(2));
    assert_eq!(classifier.classify(90.0, 15.0), SegmentId(3));
    assert_eq!(classifier.classify(90.0, 85.0), SegmentId(4));

    let action = classifier.action(SegmentId(4)).unwrap();
    assert!(action.starts_with("High-income, high-spender"));
}

#[test]
fn test_six_clusters_match_action_wording() {
    let classifier =
        FittedClassifier::fit(Revision::Kmeans6, &reference(), ClusterOptions::default()).unwrap();

    assert_eq!(classifier.classify(25.0, 20.0), SegmentId(0));
    assert_eq!(classifier.classify(25.0, 80.0), SegmentId(1));
    assert_eq!(classifier.classify(90.0, 15.0), SegmentId(3));
    assert_eq!(classifier.classify(90.0, 85.0), SegmentId(4));

    let vip = classifier.action(SegmentId(4)).unwrap();
    assert!(vip.contains("VIP"), "{}", vip);
    let low_spend = classifier.action(SegmentId(3)).unwrap();
    assert!(low_spend.starts_with("High-income, spending score below 60"));

    // Both high-income segments are populated in the reference table
    let count = |id: SegmentId| {
        classifier
            .reference_table()
            .iter()
            .filter(|row| row.segment_id == id)
            .count()
    };
    assert!(count(SegmentId(3)) > 0);
    assert!(count(SegmentId(4)) > 0);
    for row in classifier.reference_table() {
        if row.segment_id == SegmentId(4) {
            assert!(row.spending_score >= REMAP_SPENDING_THRESHOLD);
        }
    }
}

#[test]
fn test_six_cluster_remap_holds_over_input_grid() {
    let classifier =
        FittedClassifier::fit(Revision::Kmeans6, &reference(), ClusterOptions::default()).unwrap();

    for income in (0..=150).step_by(3) {
        for score in (0..=100).step_by(3) {
            let (i, s) = (income as f64, score as f64);
            let raw = classifier.raw_label(i, s);
            let label = classifier.classify(i, s);
            if raw == REMAP_SOURCE && s < REMAP_SPENDING_THRESHOLD {
                assert_eq!(label, REMAP_TARGET, "({}, {})", i, s);
            } else {
                assert_eq!(label, raw, "({}, {})", i, s);
            }
        }
    }

    for row in classifier.reference_table() {
        assert_eq!(row.segment_id, classifier.classify(row.income, row.spending_score));
        assert!(classifier.action(row.segment_id).is_some());
    }
}

#[test]
fn test_startup_fit_is_reproducible() {
    let options = ClusterOptions::default();
    let a = build_classifier(Revision::Kmeans6, &dataset_path(), options).unwrap();
    let b = build_classifier(Revision::Kmeans6, &dataset_path(), options).unwrap();

    assert_eq!(a.reference_table(), b.reference_table());
    for income in (0..=150).step_by(10) {
        for score in (0..=100).step_by(10) {
            let (i, s) = (income as f64, score as f64);
            assert_eq!(a.classify(i, s), b.classify(i, s));
        }
    }
}

#[test]
fn test_different_seed_still_yields_valid_labels() {
    let options = ClusterOptions {
        seed: 1234,
        income_weight: None,
    };
    let classifier = FittedClassifier::fit(Revision::Kmeans5, &reference(), options).unwrap();
    assert_eq!(classifier.model().k(), 5);
    for row in classifier.reference_table() {
        assert!(row.segment_id.0 < 5);
    }
}
