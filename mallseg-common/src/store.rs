//! In-memory session store
//!
//! Append-only, insertion-ordered list of customer submissions that lives
//! for the process lifetime. Nothing is persisted; a restart starts empty.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::segment::SegmentId;

/// One customer form submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub income: f64,
    pub spending_score: f64,
    pub segment_id: SegmentId,
}

/// Shared submission list
///
/// The service handles many clients, so every access goes through a mutex.
/// Critical sections never await.
#[derive(Debug, Default)]
pub struct SessionStore {
    submissions: Mutex<Vec<Submission>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Submission>> {
        // A panic while holding the lock cannot leave a half-pushed Vec
        self.submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a submission at the end; returns the new length
    pub fn append(&self, submission: Submission) -> usize {
        let mut submissions = self.lock();
        submissions.push(submission);
        submissions.len()
    }

    /// Snapshot of every submission in insertion order
    pub fn all(&self) -> Vec<Submission> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
