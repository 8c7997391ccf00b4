//! Per-run synchronization statistics.
//!
//! Counts are observability output only: the orchestrator logs a summary at
//! the end of each account's run and the fleet sweep logs its failure count,
//! but nothing here is returned to trigger callers.

/// Counters for one account's synchronization run.
#[derive(Debug, Clone, Default)]
pub struct SyncRunStats {
    /// Gateway pages fetched.
    pub pages: usize,
    /// Records returned across all pages.
    pub fetched: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Publishes that failed or timed out; the corresponding upserts stay
    /// committed.
    pub publish_failures: usize,
}

impl SyncRunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page(&mut self, records: usize) {
        self.pages += 1;
        self.fetched += records;
    }

    pub fn record_upsert(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn record_publish_failure(&mut self) {
        self.publish_failures += 1;
    }

    /// Human-readable summary for the completion log line.
    pub fn summary(&self) -> String {
        format!(
            "{} pages, {} fetched, {} inserted, {} updated{}",
            self.pages,
            self.fetched,
            self.inserted,
            self.updated,
            if self.publish_failures == 0 {
                String::new()
            } else {
                format!(" ({} publish failures)", self.publish_failures)
            }
        )
    }
}
