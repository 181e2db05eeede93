//! JSON-file consultation store.
//!
//! The whole map is loaded on open and rewritten on every write and on close.
//! Writes go to a sibling temp file first and are renamed into place.

use super::{ConsultationStore, StoredConsultation};
use crate::error::{EpicConsultError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub struct JsonFileConsultationStore {
    path: PathBuf,
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, StoredConsultation>>,
}

impl JsonFileConsultationStore {
    /// Load `path` if it exists, dropping entries that have already expired.
    ///
    /// At most `max_entries` consultations are kept; the oldest go first.
    pub async fn open(path: impl AsRef<Path>, ttl: Duration, max_entries: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries: HashMap<String, StoredConsultation> =
            match tokio::fs::read_to_string(&path).await {
                Ok(content) if content.trim().is_empty() => HashMap::new(),
                Ok(content) => serde_json::from_str(&content).map_err(|e| {
                    EpicConsultError::Store {
                        message: format!("corrupt store file {}: {}", path.display(), e),
                    }
                })?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
                Err(e) => return Err(e.into()),
            };

        let max_entries = max_entries.max(1);
        let before = entries.len();
        prune(&mut entries, ttl, max_entries);
        tracing::info!(
            "Opened consultation store {} ({} entries, {} dropped on load)",
            path.display(),
            entries.len(),
            before - entries.len()
        );

        Ok(Self {
            path,
            ttl,
            max_entries,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, StoredConsultation>) -> Result<()> {
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Drop expired entries, then the oldest until at most `max_entries` remain.
fn prune(entries: &mut HashMap<String, StoredConsultation>, ttl: Duration, max_entries: usize) {
    let now = Utc::now();
    entries.retain(|_, v| !v.is_expired(ttl, now));
    if entries.len() <= max_entries {
        return;
    }
    let mut by_age: Vec<(DateTime<Utc>, String)> = entries
        .iter()
        .map(|(k, v)| (v.created_at, k.clone()))
        .collect();
    by_age.sort();
    let excess = entries.len() - max_entries;
    for (_, key) in by_age.into_iter().take(excess) {
        tracing::debug!("evicting oldest consultation {}", key);
        entries.remove(&key);
    }
}

#[async_trait]
impl ConsultationStore for JsonFileConsultationStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<StoredConsultation>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(self.ttl, Utc::now()) => {
                    return Ok(Some(entry.clone()));
                }
                Some(_) => {}
            }
        }
        // expired: drop it from memory, the file catches up on the next write
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|v| v.is_expired(self.ttl, Utc::now()))
        {
            tracing::debug!("evicting expired consultation {}", key);
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: StoredConsultation) -> Result<()> {
        // held across persist so concurrent writers cannot interleave file writes
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        prune(&mut next, self.ttl, self.max_entries);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }

    async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|v| !v.is_expired(self.ttl, now))
            .count()
    }

    async fn close(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        prune(&mut next, self.ttl, self.max_entries);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, RawBusinessContext};
    use tempfile::tempdir;

    fn entry(company: &str, age_days: i64) -> StoredConsultation {
        let ctx = engine::normalize(&RawBusinessContext {
            company_name: Some(company.into()),
            ..Default::default()
        });
        let mut stored = StoredConsultation::new(ctx.clone(), engine::consult(&ctx));
        stored.created_at = Utc::now() - Duration::days(age_days);
        stored
    }

    #[test]
    fn test_prune_drops_expired_then_oldest() {
        let mut entries = HashMap::new();
        for (name, age) in [("a", 60), ("b", 3), ("c", 2), ("d", 1)] {
            let e = entry(name, age);
            entries.insert(e.cache_key.clone(), e);
        }
        prune(&mut entries, Duration::days(30), 2);
        let mut keys: Vec<_> = entries.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["c-general-mid-market", "d-general-mid-market"]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("store.json");
        let store = JsonFileConsultationStore::open(&path, Duration::days(30), 10)
            .await
            .expect("open");
        let e = entry("acme", 0);
        assert!(store.set(&e.cache_key.clone(), e.clone()).await.is_err());
        assert_eq!(store.len().await, 0);
        assert!(store.get(&e.cache_key).await.expect("get").is_none());
        assert!(!path.exists());
    }
}
