//! Implements ChangeFeedPort over newline-delimited JSON change records.
//!
//! One record per line:
//! `{"ref": "users/u1/shareWith", "before": false, "after": true}`
//! Missing or `null` values mean the field was absent. Records are handled
//! strictly one after another.

use crate::domain::{DomainError, EventOutcome};
use crate::ports::ChangeFeedPort;
use crate::usecases::AvailabilityService;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A single write of a watched field, as emitted by the change feed.
#[derive(Debug, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "ref")]
    pub path: String,
    #[serde(default)]
    pub before: Option<serde_json::Value>,
    #[serde(default)]
    pub after: Option<serde_json::Value>,
}

/// Counters for one feed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    pub records: usize,
    pub malformed: usize,
    pub completed: usize,
    pub discarded: usize,
}

pub struct JsonLinesFeed<R> {
    reader: Mutex<R>,
    service: Arc<AvailabilityService>,
    stats: Mutex<FeedStats>,
}

impl<R> JsonLinesFeed<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, service: Arc<AvailabilityService>) -> Self {
        Self {
            reader: Mutex::new(reader),
            service,
            stats: Mutex::new(FeedStats::default()),
        }
    }

    pub async fn stats(&self) -> FeedStats {
        self.stats.lock().await.clone()
    }

    async fn handle_line(&self, line: &str) {
        let record: ChangeRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "skipping malformed change record");
                self.stats.lock().await.malformed += 1;
                return;
            }
        };

        let outcome = self
            .service
            .handle_change(&record.path, record.before.into(), record.after.into())
            .await;

        let mut stats = self.stats.lock().await;
        stats.records += 1;
        match outcome {
            EventOutcome::Completed(_) => stats.completed += 1,
            EventOutcome::Discarded(reason) => {
                debug!(path = %record.path, ?reason, "event discarded");
                stats.discarded += 1;
            }
        }
    }
}

#[async_trait]
impl<R> ChangeFeedPort for JsonLinesFeed<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn run(&self) -> Result<(), DomainError> {
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| DomainError::Feed(format!("read change record: {}", e)))?;
            if n == 0 {
                break;
            }
            // A bad line is one bad record, not a broken feed.
            let line = match std::str::from_utf8(&buf) {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "skipping change record that is not valid UTF-8");
                    self.stats.lock().await.malformed += 1;
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.handle_line(trimmed).await;
        }

        let stats = self.stats().await;
        info!(
            records = stats.records,
            completed = stats.completed,
            discarded = stats.discarded,
            malformed = stats.malformed,
            "change feed ended"
        );
        Ok(())
    }
}
