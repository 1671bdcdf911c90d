//! # mallseg Common Library
//!
//! Domain code for the mall customer segmentation service:
//! - Segment ids, revisions and action tables
//! - Rule-table and k-means classifiers
//! - Reference dataset loading and min-max scaling
//! - In-memory session store and the operator access gate
//! - Configuration loading

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod gate;
pub mod kmeans;
pub mod scaler;
pub mod segment;
pub mod store;

pub use classifier::{build_classifier, ClusterOptions, SegmentClassifier};
pub use error::{Error, Result};
pub use gate::{AccessGate, StaticCredentialGate};
pub use segment::{Revision, SegmentId};
pub use store::{SessionStore, Submission};
