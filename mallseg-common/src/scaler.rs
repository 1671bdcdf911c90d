//! Per-feature min-max scaling
//!
//! Wraps `linfa_preprocessing`'s min-max `LinearScaler`. Fitted once over the
//! reference dataset and reused unchanged for every prediction. Values outside
//! the fitted range extrapolate linearly.

use linfa::traits::{Fit, Transformer};
use linfa::DatasetBase;
use linfa_preprocessing::linear_scaling::LinearScaler;
use ndarray::{Array1, Array2, Axis};

use crate::{Error, Result};

/// Min-max scaler over fixed-width feature rows
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    inner: LinearScaler<f64>,
    min: Array1<f64>,
    max: Array1<f64>,
}

impl MinMaxScaler {
    /// Fit per-column minimum and maximum
    ///
    /// Records must be non-empty, finite, and vary in every column.
    pub fn fit(records: &Array2<f64>) -> Result<Self> {
        if records.nrows() == 0 || records.ncols() == 0 {
            return Err(Error::Model(
                "cannot fit scaler on an empty dataset".to_string(),
            ));
        }
        if records.iter().any(|v| !v.is_finite()) {
            return Err(Error::Model("scaler input must be finite".to_string()));
        }

        let min = records.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let max = records.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if let Some(col) = min.iter().zip(max.iter()).position(|(lo, hi)| lo == hi) {
            return Err(Error::Model(format!(
                "column {} is constant and cannot be scaled",
                col
            )));
        }

        let inner = LinearScaler::<f64>::min_max()
            .fit(&DatasetBase::from(records.clone()))
            .map_err(|e| Error::Model(format!("scaler fit failed: {}", e)))?;

        Ok(Self { inner, min, max })
    }

    pub fn n_features(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &Array1<f64> {
        &self.min
    }

    pub fn max(&self) -> &Array1<f64> {
        &self.max
    }

    /// Scale a batch of rows with the fitted parameters
    pub fn transform(&self, records: Array2<f64>) -> Array2<f64> {
        self.inner.transform(records)
    }

    /// Scale one row
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        let records = Array2::from_shape_fn((1, row.len()), |(_, col)| row[col]);
        self.transform(records).iter().copied().collect()
    }

    /// Map a scaled row back to input units
    pub fn inverse_row(&self, scaled: &[f64]) -> Vec<f64> {
        scaled
            .iter()
            .zip(self.min.iter().zip(self.max.iter()))
            .map(|(&v, (&lo, &hi))| v * (hi - lo) + lo)
            .collect()
    }
}
