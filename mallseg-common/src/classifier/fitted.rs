//! Clustering classifier fitted once at startup

use ndarray::Array2;
use tracing::info;

use crate::classifier::{LabeledPoint, SegmentClassifier};
use crate::dataset::ReferencePoint;
use crate::kmeans::{FittedKMeans, KMeans, DEFAULT_SEED};
use crate::scaler::MinMaxScaler;
use crate::segment::{Revision, SegmentId};
use crate::{Error, Result};

/// Raw cluster that the six-cluster revision splits on spending score
pub const REMAP_SOURCE: SegmentId = SegmentId(4);
/// Where low spenders from `REMAP_SOURCE` are moved
pub const REMAP_TARGET: SegmentId = SegmentId(3);
pub const REMAP_SPENDING_THRESHOLD: f64 = 60.0;

/// Where each canonical id sits in unweighted scaled (income, spending) units
///
/// Id `i` goes to the centroid nearest `ARCHETYPES[i]`; clusters left over
/// (k > 5) take the following ids in ascending (income, spending) order.
pub const ARCHETYPES: [[f64; 2]; 5] = [
    [0.0, 0.0], // low income, low spending
    [0.0, 1.0], // low income, high spending
    [0.5, 0.5], // average
    [1.0, 0.0], // high income, low spending
    [1.0, 1.0], // high income, high spending
];

/// Fit-time knobs for clustering revisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    pub seed: u64,
    /// Overrides the revision's default income weight
    pub income_weight: Option<f64>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            income_weight: None,
        }
    }
}

/// Post-processing override for raw cluster labels
pub fn remap(raw: SegmentId, spending_score: f64) -> SegmentId {
    if raw == REMAP_SOURCE && spending_score < REMAP_SPENDING_THRESHOLD {
        REMAP_TARGET
    } else {
        raw
    }
}

/// Immutable scaler + centroid set built from the reference dataset
///
/// There is no unfitted state: the only constructor is `fit`.
#[derive(Debug, Clone)]
pub struct FittedClassifier {
    revision: Revision,
    scaler: MinMaxScaler,
    income_weight: f64,
    model: FittedKMeans,
    reference: Vec<LabeledPoint>,
}

impl FittedClassifier {
    pub fn fit(
        revision: Revision,
        dataset: &[ReferencePoint],
        options: ClusterOptions,
    ) -> Result<Self> {
        let k = revision.clusters().ok_or_else(|| {
            Error::InvalidInput(format!("revision '{}' is not a clustering revision", revision))
        })?;

        let income_weight = options
            .income_weight
            .unwrap_or_else(|| revision.default_income_weight());
        if !income_weight.is_finite() || income_weight <= 0.0 {
            return Err(Error::Model(format!(
                "income weight must be positive, got {}",
                income_weight
            )));
        }

        let records = Array2::from_shape_fn((dataset.len(), 2), |(row, col)| {
            dataset[row].features()[col]
        });
        let scaler = MinMaxScaler::fit(&records)?;
        let mut features = scaler.transform(records);
        features.column_mut(0).mapv_inplace(|v| v * income_weight);

        let model = KMeans::new(k).with_seed(options.seed).fit(&features)?;
        let order = canonical_order(model.centroids(), income_weight);
        let model = model.permute(&order)?;

        info!(
            "Fitted {} clusters (revision {}, seed {}, income weight {}, inertia {:.4})",
            k,
            revision,
            options.seed,
            income_weight,
            model.inertia()
        );

        let mut classifier = Self {
            revision,
            scaler,
            income_weight,
            model,
            reference: Vec::new(),
        };
        let reference = dataset
            .iter()
            .map(|p| LabeledPoint {
                income: p.income,
                spending_score: p.spending_score,
                segment_id: classifier.classify(p.income, p.spending_score),
            })
            .collect();
        classifier.reference = reference;

        for (id, (income, score)) in classifier.centroids_in_input_units().iter().enumerate() {
            info!(
                "Cluster {}: centroid income {:.1}k$, spending score {:.1}",
                id, income, score
            );
        }

        Ok(classifier)
    }

    /// Nearest-centroid label before any remap
    pub fn raw_label(&self, income: f64, spending_score: f64) -> SegmentId {
        let features = weighted(
            self.scaler.transform_row(&[income, spending_score]),
            self.income_weight,
        );
        SegmentId::from(self.model.predict(&features))
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn model(&self) -> &FittedKMeans {
        &self.model
    }

    pub fn income_weight(&self) -> f64 {
        self.income_weight
    }

    /// Centroids mapped back to (income, spending score) units
    pub fn centroids_in_input_units(&self) -> Vec<(f64, f64)> {
        self.model
            .centroids()
            .outer_iter()
            .map(|c| {
                let unscaled = self
                    .scaler
                    .inverse_row(&[c[0] / self.income_weight, c[1]]);
                (unscaled[0], unscaled[1])
            })
            .collect()
    }
}

impl SegmentClassifier for FittedClassifier {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn classify(&self, income: f64, spending_score: f64) -> SegmentId {
        let raw = self.raw_label(income, spending_score);
        if self.revision.remaps() {
            remap(raw, spending_score)
        } else {
            raw
        }
    }

    fn reference_table(&self) -> &[LabeledPoint] {
        &self.reference
    }
}

fn weighted(mut scaled: Vec<f64>, income_weight: f64) -> Vec<f64> {
    scaled[0] *= income_weight;
    scaled
}

/// Raw cluster index for each canonical id
///
/// Archetypes claim their nearest unclaimed centroid in id order (lowest raw
/// index on ties); the rest follow sorted by income, then spending.
fn canonical_order(centroids: &Array2<f64>, income_weight: f64) -> Vec<usize> {
    let points: Vec<[f64; 2]> = centroids
        .outer_iter()
        .map(|c| [c[0] / income_weight, c[1]])
        .collect();
    let distance = |p: [f64; 2], q: [f64; 2]| (p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2);

    let mut order: Vec<usize> = Vec::with_capacity(points.len());
    for archetype in ARCHETYPES {
        let closest = (0..points.len())
            .filter(|i| !order.contains(i))
            .min_by(|&a, &b| distance(points[a], archetype).total_cmp(&distance(points[b], archetype)));
        if let Some(raw) = closest {
            order.push(raw);
        }
    }

    let mut rest: Vec<usize> = (0..points.len()).filter(|i| !order.contains(i)).collect();
    rest.sort_by(|&a, &b| {
        points[a][0]
            .total_cmp(&points[b][0])
            .then(points[a][1].total_cmp(&points[b][1]))
    });
    order.extend(rest);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Five tight groups on the corners and middle of the income/score plane
    fn five_groups() -> Vec<ReferencePoint> {
        let centers = [(25.0, 20.0), (25.0, 80.0), (55.0, 50.0), (90.0, 20.0), (90.0, 80.0)];
        let mut points = Vec::new();
        for (income, score) in centers {
            for (di, ds) in [(-3.0, -2.0), (2.0, 3.0), (0.0, -4.0), (3.0, 1.0), (-2.0, 2.0)] {
                points.push(ReferencePoint {
                    income: income + di,
                    spending_score: score + ds,
                });
            }
        }
        points
    }

    #[test]
    fn test_rules_revision_cannot_be_fitted() {
        let err = FittedClassifier::fit(Revision::Rules, &five_groups(), ClusterOptions::default());
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_income_weight_is_rejected() {
        let options = ClusterOptions {
            income_weight: Some(0.0),
            ..Default::default()
        };
        assert!(FittedClassifier::fit(Revision::Kmeans5, &five_groups(), options).is_err());
    }

    #[test]
    fn test_canonical_ids_follow_archetypes() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans5, &five_groups(), ClusterOptions::default())
                .unwrap();
        assert_eq!(classifier.income_weight(), 1.5);
        assert_eq!(classifier.classify(25.0, 20.0), SegmentId(0));
        assert_eq!(classifier.classify(25.0, 80.0), SegmentId(1));
        assert_eq!(classifier.classify(55.0, 50.0), SegmentId(2));
        assert_eq!(classifier.classify(90.0, 20.0), SegmentId(3));
        assert_eq!(classifier.classify(90.0, 80.0), SegmentId(4));
    }

    #[test]
    fn test_refit_with_same_seed_is_identical() {
        let a = FittedClassifier::fit(Revision::Kmeans6, &five_groups(), ClusterOptions::default())
            .unwrap();
        let b = FittedClassifier::fit(Revision::Kmeans6, &five_groups(), ClusterOptions::default())
            .unwrap();
        assert_eq!(a.model(), b.model());
        for income in (0..=150).step_by(10) {
            for score in (0..=100).step_by(10) {
                let (i, s) = (income as f64, score as f64);
                assert_eq!(a.classify(i, s), b.classify(i, s));
                assert_eq!(a.classify(i, s), a.classify(i, s));
            }
        }
    }

    #[test]
    fn test_remap_rule() {
        assert_eq!(remap(SegmentId(4), 59.9), SegmentId(3));
        assert_eq!(remap(SegmentId(4), 60.0), SegmentId(4));
        assert_eq!(remap(SegmentId(4), 95.0), SegmentId(4));
        assert_eq!(remap(SegmentId(2), 10.0), SegmentId(2));
        assert_eq!(remap(SegmentId(5), 10.0), SegmentId(5));
    }

    #[test]
    fn test_six_cluster_predictions_apply_remap() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans6, &five_groups(), ClusterOptions::default())
                .unwrap();
        for income in (0..=150).step_by(5) {
            for score in (0..=100).step_by(5) {
                let (i, s) = (income as f64, score as f64);
                let raw = classifier.raw_label(i, s);
                let got = classifier.classify(i, s);
                if raw == REMAP_SOURCE && s < REMAP_SPENDING_THRESHOLD {
                    assert_eq!(got, REMAP_TARGET);
                } else {
                    assert_eq!(got, raw);
                }
                assert!(classifier.action(got).is_some());
            }
        }
    }

    #[test]
    fn test_five_cluster_revision_never_remaps() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans5, &five_groups(), ClusterOptions::default())
                .unwrap();
        for income in (0..=150).step_by(5) {
            for score in (0..=100).step_by(5) {
                let (i, s) = (income as f64, score as f64);
                assert_eq!(classifier.classify(i, s), classifier.raw_label(i, s));
            }
        }
    }

    #[test]
    fn test_reference_labels_match_live_predictions() {
        let data = five_groups();
        let classifier =
            FittedClassifier::fit(Revision::Kmeans6, &data, ClusterOptions::default()).unwrap();
        let table = classifier.reference_table();
        assert_eq!(table.len(), data.len());
        for (row, point) in table.iter().zip(&data) {
            assert_eq!(row.income, point.income);
            assert_eq!(row.segment_id, classifier.classify(point.income, point.spending_score));
        }
    }

    #[test]
    fn test_centroids_in_input_units_land_near_groups() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans5, &five_groups(), ClusterOptions::default())
                .unwrap();
        let centroids = classifier.centroids_in_input_units();
        assert_eq!(centroids.len(), 5);
        let (income, score) = centroids[4];
        assert!((income - 90.0).abs() < 2.0, "income {}", income);
        assert!((score - 80.0).abs() < 2.0, "score {}", score);
    }

    #[test]
    fn test_out_of_range_input_still_classifies() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans5, &five_groups(), ClusterOptions::default())
                .unwrap();
        assert_eq!(classifier.classify(500.0, 500.0), SegmentId(4));
        assert_eq!(classifier.classify(-100.0, -100.0), SegmentId(0));
    }

    #[test]
    fn test_huge_income_lands_in_a_high_income_segment() {
        let classifier =
            FittedClassifier::fit(Revision::Kmeans5, &five_groups(), ClusterOptions::default())
                .unwrap();
        for income in [1e200, f64::MAX, f64::INFINITY] {
            for score in [10.0, 90.0] {
                let id = classifier.classify(income, score);
                assert!(
                    matches!(id, SegmentId(3) | SegmentId(4)),
                    "({}, {}) -> {}",
                    income,
                    score,
                    id
                );
            }
        }
    }

    #[test]
    fn test_extra_cluster_takes_the_last_id() {
        // Six groups: the five archetypes plus a second average group
        let mut data = five_groups();
        for (di, ds) in [(-1.0, 0.0), (1.0, 1.0), (0.0, -1.0), (1.0, -1.0)] {
            data.push(ReferencePoint {
                income: 65.0 + di,
                spending_score: 40.0 + ds,
            });
        }
        let classifier =
            FittedClassifier::fit(Revision::Kmeans6, &data, ClusterOptions::default()).unwrap();

        assert_eq!(classifier.classify(25.0, 20.0), SegmentId(0));
        assert_eq!(classifier.classify(25.0, 80.0), SegmentId(1));
        assert_eq!(classifier.classify(90.0, 20.0), SegmentId(3));
        assert_eq!(classifier.classify(90.0, 80.0), SegmentId(4));
        let middle = [classifier.classify(55.0, 50.0), classifier.classify(65.0, 40.0)];
        assert!(middle.contains(&SegmentId(2)));
        assert!(middle.contains(&SegmentId(5)));
    }

    #[test]
    fn test_canonical_order_matches_archetypes_then_sorts_rest() {
        let centroids = ndarray::array![
            [0.9, 0.9],
            [0.6, 0.4],
            [0.1, 0.1],
            [0.95, 0.05],
            [0.45, 0.55],
            [0.05, 0.95],
        ];
        assert_eq!(canonical_order(&centroids, 1.0), vec![2, 5, 4, 3, 0, 1]);

        let mut weighted = centroids.clone();
        weighted.column_mut(0).mapv_inplace(|v| v * 1.5);
        assert_eq!(canonical_order(&weighted, 1.5), vec![2, 5, 4, 3, 0, 1]);
    }
}
