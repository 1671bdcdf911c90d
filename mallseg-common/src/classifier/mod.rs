//! Segment classifiers
//!
//! Two implementations sit behind [`SegmentClassifier`]:
//! - [`RuleClassifier`]: the static threshold table
//! - [`FittedClassifier`]: min-max scaling + k-means, fitted once at startup
//!
//! Request handling only sees `Arc<dyn SegmentClassifier>`, built by
//! [`build_classifier`] before the server starts.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::dataset::load_reference_dataset;
use crate::segment::{Revision, SegmentId};
use crate::Result;

mod fitted;
mod rules;

pub use fitted::{
    remap, ClusterOptions, FittedClassifier, REMAP_SOURCE, REMAP_SPENDING_THRESHOLD, REMAP_TARGET,
};
pub use rules::{rule_segment, RuleClassifier};

/// Reference dataset row with the label the live classifier gives it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabeledPoint {
    pub income: f64,
    pub spending_score: f64,
    pub segment_id: SegmentId,
}

/// Assigns an (income, spending score) pair to a segment
pub trait SegmentClassifier: Send + Sync {
    fn revision(&self) -> Revision;

    /// Pure and total: every finite or non-finite input gets a segment.
    fn classify(&self, income: f64, spending_score: f64) -> SegmentId;

    /// Marketing action for a segment, from the revision's static table
    fn action(&self, segment: SegmentId) -> Option<&'static str> {
        self.revision().action(segment)
    }

    /// Labelled reference rows (empty for the rule table)
    fn reference_table(&self) -> &[LabeledPoint] {
        &[]
    }
}

/// Build the classifier for `revision`
///
/// The rule table needs no data. Clustering revisions load `dataset` and fit
/// once; any dataset or fit error is returned for the caller to treat as fatal.
pub fn build_classifier(
    revision: Revision,
    dataset: &Path,
    options: ClusterOptions,
) -> Result<Arc<dyn SegmentClassifier>> {
    match revision {
        Revision::Rules => Ok(Arc::new(RuleClassifier::new())),
        Revision::Kmeans5 | Revision::Kmeans6 => {
            let points = load_reference_dataset(dataset)?;
            Ok(Arc::new(FittedClassifier::fit(revision, &points, options)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_build_without_dataset() {
        let classifier = build_classifier(
            Revision::Rules,
            Path::new("/nonexistent.csv"),
            ClusterOptions::default(),
        )
        .unwrap();
        assert_eq!(classifier.revision(), Revision::Rules);
        assert_eq!(classifier.classify(60.0, 50.0), SegmentId(1));
        assert!(classifier.reference_table().is_empty());
    }

    #[test]
    fn test_clustering_build_fails_without_dataset() {
        let result = build_classifier(
            Revision::Kmeans5,
            Path::new("/nonexistent.csv"),
            ClusterOptions::default(),
        );
        assert!(result.is_err());
    }
}
