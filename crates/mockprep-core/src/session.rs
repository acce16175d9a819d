//! Per-session state: the ordered answer history plus progress.

use serde::{Deserialize, Serialize};

use crate::model::InterviewRecord;
use crate::progress::ProgressTracker;

/// Append-only, in-memory history of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStore {
    records: Vec<InterviewRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InterviewRecord) {
        self.records.push(record);
    }

    /// Records in submission order.
    pub fn records(&self) -> &[InterviewRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&InterviewRecord> {
        self.records.last()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Everything one practice session owns. Passed explicitly to the engine.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub store: SessionStore,
    pub progress: ProgressTracker,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear history and progress. Difficulty reverts to easy.
    pub fn reset(&mut self) {
        self.store.clear();
        self.progress.reset();
        tracing::info!("session reset");
    }
}
