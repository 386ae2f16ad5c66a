use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Payload written into a lock file by its holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockMarker {
    pub pid: u32,
    pub acquired_at_ms: i64,
    pub token: String,
}

impl LockMarker {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            pid: std::process::id(),
            acquired_at_ms: Utc::now().timestamp_millis(),
            token: token.into(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // A struct of plain fields cannot fail to serialize.
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// Time since the marker was written. Clock skew into the future counts as zero.
    pub fn age(&self) -> Duration {
        let elapsed = Utc::now().timestamp_millis() - self.acquired_at_ms;
        Duration::from_millis(elapsed.max(0) as u64)
    }
}

/// Age of a lock file whose payload is missing or unreadable, from its mtime.
pub(crate) async fn file_age(path: &Path) -> std::io::Result<Duration> {
    let modified = tokio::fs::metadata(path).await?.modified()?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO))
}
