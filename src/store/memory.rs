//! Bounded in-memory consultation store (LRU) with read-time TTL eviction.

use super::{ConsultationStore, StoredConsultation};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;

pub struct InMemoryConsultationStore {
    entries: RwLock<LruCache<String, StoredConsultation>>,
    ttl: Duration,
}

impl InMemoryConsultationStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }
}

#[async_trait]
impl ConsultationStore for InMemoryConsultationStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<StoredConsultation>> {
        // LRU reads promote, so even lookups take the write lock
        let mut entries = self.entries.write().await;
        let expired = match entries.get(key) {
            None => return Ok(None),
            Some(entry) => entry.is_expired(self.ttl, Utc::now()),
        };
        if expired {
            tracing::debug!("evicting expired consultation {}", key);
            entries.pop(key);
            return Ok(None);
        }
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: StoredConsultation) -> Result<()> {
        let mut entries = self.entries.write().await;
        if let Some((evicted, _)) = entries.push(key.to_string(), value)
            && evicted != key
        {
            tracing::debug!("LRU evicted consultation {}", evicted);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.pop(key).is_some())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn close(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
