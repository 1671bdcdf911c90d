//! Seeded k-means clustering
//!
//! Fitting is delegated to `linfa_clustering::KMeans` (k-means++ init,
//! several runs, best inertia kept) driven by a `Pcg64Mcg` seeded from the
//! configured value, so the same data and seed always produce the same
//! centroids.
//!
//! `KMeans` only holds hyperparameters. Prediction lives on `FittedKMeans`,
//! which can only be obtained from a successful `fit`.

use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_clustering::KMeans as LinfaKMeans;
use ndarray::{Array2, ArrayView1, Axis};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_SEED: u64 = 42;
const DEFAULT_N_RUNS: usize = 10;
const DEFAULT_MAX_ITER: u64 = 300;
const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Unfitted k-means hyperparameters
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    n_runs: usize,
    max_iter: u64,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: DEFAULT_SEED,
            n_runs: DEFAULT_N_RUNS,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_runs(mut self, n_runs: usize) -> Self {
        self.n_runs = n_runs.max(1);
        self
    }

    /// Fit centroids over the rows of `records`
    pub fn fit(&self, records: &Array2<f64>) -> Result<FittedKMeans> {
        if self.k == 0 {
            return Err(Error::Model("k must be at least 1".to_string()));
        }
        if records.nrows() < self.k {
            return Err(Error::Model(format!(
                "need at least {} points to fit {} clusters, got {}",
                self.k,
                self.k,
                records.nrows()
            )));
        }
        if records.ncols() == 0 {
            return Err(Error::Model("points must have at least one feature".to_string()));
        }
        if records.iter().any(|v| !v.is_finite()) {
            return Err(Error::Model("points must be finite".to_string()));
        }

        let dataset = DatasetBase::from(records.clone());
        let model = LinfaKMeans::params_with_rng(self.k, Pcg64Mcg::seed_from_u64(self.seed))
            .n_runs(self.n_runs)
            .max_n_iterations(self.max_iter)
            .tolerance(DEFAULT_TOLERANCE)
            .fit(&dataset)
            .map_err(|e| Error::Model(format!("k-means fit failed: {}", e)))?;

        let centroids = model.centroids().to_owned();
        let inertia: f64 = records
            .outer_iter()
            .map(|row| {
                centroids
                    .outer_iter()
                    .map(|c| squared_distance(c, row))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();
        debug!(k = self.k, seed = self.seed, inertia, "k-means fit finished");

        Ok(FittedKMeans { centroids, inertia })
    }
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Fitted, read-only centroid set
#[derive(Debug, Clone, PartialEq)]
pub struct FittedKMeans {
    centroids: Array2<f64>,
    inertia: f64,
}

impl FittedKMeans {
    /// One centroid per row, in cluster id order
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    /// Sum of squared distances from each training point to its centroid
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Assign a point to its nearest centroid (lowest id on ties)
    ///
    /// Centroids `a` and `b` are compared through the sign of
    /// `(b - a)·(x - (a + b) / 2)`, which matches comparing squared distances
    /// but never squares `x`. The point is divided by its largest magnitude
    /// first, so huge inputs stay finite and go to the centroid furthest
    /// along their direction. Infinities are treated as `f64::MAX`; NaN input
    /// goes to cluster 0.
    pub fn predict(&self, point: &[f64]) -> usize {
        let point: Vec<f64> = point.iter().map(|v| v.clamp(f64::MIN, f64::MAX)).collect();
        let magnitude = point.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        let point: Vec<f64> = point.iter().map(|v| v / magnitude).collect();

        let mut best = 0;
        for id in 1..self.k() {
            let a = self.centroids.row(id);
            let b = self.centroids.row(best);
            let side: f64 = a
                .iter()
                .zip(b.iter())
                .zip(&point)
                .map(|((a, b), x)| (b - a) * (x - (a + b) / 2.0 / magnitude))
                .sum();
            if side < 0.0 {
                best = id;
            }
        }
        best
    }

    /// Renumber clusters: new id `i` is old id `order[i]`
    ///
    /// Cluster ids coming out of a fit depend on initialization; this pins
    /// them to a stable order so the action tables can name them.
    pub fn permute(self, order: &[usize]) -> Result<Self> {
        let mut seen = vec![false; self.k()];
        for &old in order {
            match seen.get_mut(old) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(Error::Model(format!(
                        "invalid cluster order {:?} for {} clusters",
                        order,
                        self.k()
                    )))
                }
            }
        }
        if order.len() != self.k() {
            return Err(Error::Model(format!(
                "cluster order has {} entries, expected {}",
                order.len(),
                self.k()
            )));
        }

        Ok(Self {
            centroids: self.centroids.select(Axis(0), order),
            inertia: self.inertia,
        })
    }
}
