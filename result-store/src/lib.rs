
use mentions_core::{CoreError, ErrorExt, MatchRecord, StoreError, Timeframe};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DAILY_RESULTS_FILE: &str = "daily_reddit_results.json";
pub const WEEKLY_RESULTS_FILE: &str = "weekly_reddit_results.json";

/// Only the `url` of a stored entry matters when loading prior results.
/// Entries with a null url are skipped without discarding the rest.
#[derive(Debug, Deserialize)]
struct StoredUrl {
    url: Option<String>,
}

/// Result file for one timeframe mode.
///
/// Each save replaces the whole file with the records that were new in that
/// run; previous contents are not carried forward.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Picks the daily file for `days == 0` and the multi-day file otherwise.
    pub fn for_timeframe(dir: &Path, timeframe: Timeframe) -> Self {
        Self::new(dir.join(result_file_name(timeframe.days())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URLs recorded by the previous run. A missing or unreadable file counts
    /// as no prior results.
    pub async fn load_existing(&self) -> HashSet<String> {
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("No previous results at {}", self.path.display());
                return HashSet::new();
            }
            Err(e) => {
                warn!("Could not load existing results: {}", e);
                return HashSet::new();
            }
        }

        match self.read_urls().await {
            Ok(urls) => {
                debug!(
                    "Loaded {} previously reported URLs from {}",
                    urls.len(),
                    self.path.display()
                );
                urls
            }
            Err(e) => {
                e.log_warn();
                warn!("Could not load existing results from {}", self.path.display());
                HashSet::new()
            }
        }
    }

    async fn read_urls(&self) -> Result<HashSet<String>, CoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let entries: Vec<StoredUrl> = serde_json::from_str(&raw)?;
        Ok(entries.into_iter().filter_map(|entry| entry.url).collect())
    }

    /// Overwrites the file with `records` as an indented JSON array.
    pub async fn save(&self, records: &[MatchRecord]) -> Result<(), CoreError> {
        let path = self.path.display().to_string();
        let mut encoded =
            serde_json::to_string_pretty(records).map_err(|source| StoreError::EncodeFailed {
                path: path.clone(),
                source,
            })?;
        encoded.push('\n');

        tokio::fs::write(&self.path, encoded)
            .await
            .map_err(|source| StoreError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        info!("Saved {} new results to {}", records.len(), path);
        Ok(())
    }
}

pub fn result_file_name(days: u32) -> &'static str {
    if days > 0 {
        WEEKLY_RESULTS_FILE
    } else {
        DAILY_RESULTS_FILE
    }
}

/// Records whose URL was not reported by the previous run, in their
/// original order.
pub fn new_results(records: Vec<MatchRecord>, existing_urls: &HashSet<String>) -> Vec<MatchRecord> {
    records
        .into_iter()
        .filter(|record| !existing_urls.contains(&record.url))
        .collect()
}
