use std::sync::Arc;

use tokio::sync::Mutex;

use super::models::{UploadHistoryEntry, UploadedSummary};

pub const MAX_HISTORY_ENTRIES: usize = 5;

/// Shared report view state: the last-received summary plus the bounded
/// upload history. Owned by the top-level application state; mutated only by
/// the upload pipeline (on success) and by logout (which clears it).
pub struct ReportStore {
    inner: Arc<Mutex<ReportState>>,
}

struct ReportState {
    summary: Option<UploadedSummary>,
    history: Vec<UploadHistoryEntry>,
    next_history_id: u64,
}

impl ReportStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ReportState {
                summary: None,
                history: Vec::with_capacity(MAX_HISTORY_ENTRIES),
                next_history_id: 1,
            })),
        }
    }

    /// Replace the current summary and record it in history, most-recent
    /// first, evicting the oldest entry past the cap.
    pub async fn install_summary(&self, summary: UploadedSummary) -> UploadHistoryEntry {
        let mut state = self.inner.lock().await;

        let entry = UploadHistoryEntry {
            id: state.next_history_id,
            filename: summary.source_filename.clone(),
            uploaded_at: summary.received_at,
            total_items: summary.total_items,
        };
        state.next_history_id += 1;

        state.history.insert(0, entry.clone());
        state.history.truncate(MAX_HISTORY_ENTRIES);
        state.summary = Some(summary);

        entry
    }

    pub async fn current_summary(&self) -> Option<UploadedSummary> {
        self.inner.lock().await.summary.clone()
    }

    pub async fn history(&self) -> Vec<UploadHistoryEntry> {
        self.inner.lock().await.history.clone()
    }

    /// Drop the summary and the entire history. Called on logout; the
    /// monotonic id counter is deliberately not reset.
    pub async fn clear(&self) {
        let mut state = self.inner.lock().await;
        state.summary = None;
        state.history.clear();
    }
}

impl Clone for ReportStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
