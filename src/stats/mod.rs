// Usage counters
//
// Fire-and-forget event counters. Recording must never slow down or fail
// a conversation, so `hit` is synchronous, lock-free at the call site and
// infallible; persistence happens separately and logs its own problems.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fire-and-forget usage recording.
pub trait UsageRecorder: Send + Sync {
    fn hit(&self, event: &str);
}

/// Serialized form of the counters, as written to ~/.wren/usage.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub started_at: Option<DateTime<Utc>>,
    pub counters: BTreeMap<String, u64>,
}

pub struct UsageStats {
    counters: DashMap<String, u64>,
    started_at: DateTime<Utc>,
    path: Option<PathBuf>,
}

impl UsageStats {
    /// In-memory counters with no persistence.
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
            started_at: Utc::now(),
            path: None,
        }
    }

    /// Fresh counters that will persist to `path`.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            counters: DashMap::new(),
            started_at: Utc::now(),
            path: Some(path),
        }
    }

    /// Standard on-disk location.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(".wren").join("usage.json"))
    }

    /// Load persisted counters from `path`. A missing file starts fresh;
    /// an unreadable or malformed one is an error the caller decides on.
    pub fn load(path: PathBuf) -> Result<Self> {
        let snapshot = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<UsageSnapshot>(&contents)
                .with_context(|| format!("invalid usage file {}", path.display()))?
        } else {
            UsageSnapshot::default()
        };
        Ok(Self {
            counters: snapshot.counters.into_iter().collect(),
            started_at: snapshot.started_at.unwrap_or_else(Utc::now),
            path: Some(path),
        })
    }

    /// Write the counters back out. Failures are logged, never raised;
    /// the recorder stays fire-and-forget end to end.
    pub fn save(&self) {
        let Some(path) = &self.path else { return };
        if let Err(err) = self.write_to(path) {
            warn!(path = %path.display(), error = %err, "failed to persist usage counters");
        }
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot())
            .context("failed to serialize usage counters")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        let counters = self
            .counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        UsageSnapshot {
            started_at: Some(self.started_at),
            counters,
        }
    }

    pub fn count(&self, event: &str) -> u64 {
        self.counters.get(event).map(|count| *count).unwrap_or(0)
    }
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageRecorder for UsageStats {
    fn hit(&self, event: &str) {
        *self.counters.entry(event.to_string()).or_insert(0) += 1;
    }
}
