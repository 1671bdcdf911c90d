//! Reference dataset loading
//!
//! The reference dataset is a headed CSV with at least the income and
//! spending-score columns. Any other columns are ignored. A missing column,
//! an unparsable value or an empty file is an error; callers treat it as
//! fatal at startup.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::{Error, Result};

pub const INCOME_COLUMN: &str = "Annual Income (k$)";
pub const SPENDING_COLUMN: &str = "Spending Score (1-100)";

/// One reference customer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub income: f64,
    pub spending_score: f64,
}

impl ReferencePoint {
    pub fn features(&self) -> [f64; 2] {
        [self.income, self.spending_score]
    }
}

/// Load the reference dataset from a CSV file
pub fn load_reference_dataset(path: &Path) -> Result<Vec<ReferencePoint>> {
    let file = std::fs::File::open(path).map_err(|e| {
        Error::Dataset(format!("cannot open {}: {}", path.display(), e))
    })?;
    let points = read_reference_dataset(file)?;
    info!(
        "Loaded {} reference rows from {}",
        points.len(),
        path.display()
    );
    Ok(points)
}

/// Parse the reference dataset from any CSV reader
pub fn read_reference_dataset<R: Read>(reader: R) -> Result<Vec<ReferencePoint>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Dataset(format!("missing column '{}'", name)))
    };
    let income_idx = column(INCOME_COLUMN)?;
    let spending_idx = column(SPENDING_COLUMN)?;

    let mut points = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    Error::Dataset(format!(
                        "row {}: '{}' is not a number in column '{}'",
                        row + 1,
                        raw,
                        name
                    ))
                })
        };
        points.push(ReferencePoint {
            income: field(income_idx, INCOME_COLUMN)?,
            spending_score: field(spending_idx, SPENDING_COLUMN)?,
        });
    }

    if points.is_empty() {
        return Err(Error::Dataset("reference dataset has no rows".to_string()));
    }

    Ok(points)
}
