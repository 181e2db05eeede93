//! Consultation cache: storage abstraction, cache keys and the cache-aside
//! wrapper the transports call.
//!
//! The engine stays pure; everything stateful lives here.

pub mod file;
pub mod memory;
pub mod progress;

pub use file::JsonFileConsultationStore;
pub use memory::InMemoryConsultationStore;
pub use progress::{ProgressReport, ScoreDeltas, compare_progress};

use crate::config::Config;
use crate::engine::{self, BusinessContext, Consultation, RawBusinessContext};
use crate::error::{EpicConsultError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use uuid::Uuid;

/// A consultation as persisted in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConsultation {
    pub id: Uuid,
    pub cache_key: String,
    pub context: BusinessContext,
    pub consultation: Consultation,
    pub created_at: DateTime<Utc>,
}

impl StoredConsultation {
    pub fn new(context: BusinessContext, consultation: Consultation) -> Self {
        Self {
            id: Uuid::new_v4(),
            cache_key: cache_key(&context),
            context,
            consultation,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= ttl
    }
}

/// Key-value store for consultations with a TTL enforced on read.
///
/// `consult_with_cache` holds a per-key lock around read-compute-write, so
/// concurrent requests for one identity run the engine at most once.
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Short backend name for logs and `/info`.
    fn backend(&self) -> &'static str;

    /// Fresh entry for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<StoredConsultation>>;

    async fn set(&self, key: &str, value: StoredConsultation) -> Result<()>;

    /// Returns whether an entry was removed.
    async fn remove(&self, key: &str) -> Result<bool>;

    async fn len(&self) -> usize;

    /// Flush and release resources. Further use after close is unspecified.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Open the backend named in the configuration.
pub async fn open_store(config: &Config) -> Result<Arc<dyn ConsultationStore>> {
    let ttl = Duration::days(config.system.cache_ttl_days);
    match config.system.cache_backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryConsultationStore::new(
            config.system.cache_max,
            ttl,
        ))),
        "file" => Ok(Arc::new(
            JsonFileConsultationStore::open(
                &config.system.cache_path,
                ttl,
                config.system.cache_max,
            )
            .await?,
        )),
        other => Err(EpicConsultError::Config {
            message: format!("unknown cache backend '{}'", other),
        }),
    }
}

/// Slug of `company_name industry business_stage`.
///
/// NFKD-folds, drops combining marks, keeps lowercase ASCII alphanumerics and
/// collapses every other run into a single `-`.
pub fn cache_key(ctx: &BusinessContext) -> String {
    slugify(&format!(
        "{} {} {}",
        ctx.company_name, ctx.industry, ctx.business_stage
    ))
}

pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsultOptions {
    /// Recompute even when a fresh cached consultation exists.
    pub refresh: bool,
}

/// What the transports hand back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultationOutcome {
    pub consultation_id: Uuid,
    pub cache_key: String,
    pub cached: bool,
    pub created_at: DateTime<Utc>,
    pub consultation: Consultation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressReport>,
    #[serde(skip)]
    pub context: BusinessContext,
}

impl ConsultationOutcome {
    fn from_stored(stored: StoredConsultation, cached: bool, progress: Option<ProgressReport>) -> Self {
        Self {
            consultation_id: stored.id,
            cache_key: stored.cache_key,
            cached,
            created_at: stored.created_at,
            consultation: stored.consultation,
            progress,
            context: stored.context,
        }
    }
}

/// Per-key locks so concurrent misses for one identity compute once.
static KEY_LOCKS: Lazy<Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

async fn key_lock(key: &str) -> Arc<Mutex<()>> {
    KEY_LOCKS
        .lock()
        .await
        .entry(key.to_string())
        .or_default()
        .clone()
}

async fn release_key_lock(key: &str, lock: Arc<Mutex<()>>) {
    let mut locks = KEY_LOCKS.lock().await;
    // one reference in the map, one here: nobody else is waiting
    if Arc::strong_count(&lock) == 2 {
        locks.remove(key);
    }
}

/// Cache-aside consultation: check the store, run the engine on a miss, write back.
///
/// A failing read degrades to a miss; a failing write is returned to the caller.
pub async fn consult_with_cache(
    store: &dyn ConsultationStore,
    raw: &RawBusinessContext,
    options: ConsultOptions,
) -> Result<ConsultationOutcome> {
    let context = engine::normalize(raw);
    let key = cache_key(&context);

    let lock = key_lock(&key).await;
    let outcome = {
        let _guard = lock.lock().await;
        consult_locked(store, context, &key, options).await
    };
    release_key_lock(&key, lock).await;
    outcome
}

async fn consult_locked(
    store: &dyn ConsultationStore,
    context: BusinessContext,
    key: &str,
    options: ConsultOptions,
) -> Result<ConsultationOutcome> {
    let previous = match store.get(key).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                "Consultation store read failed for {}: {}. Treating as cache miss.",
                key,
                e
            );
            None
        }
    };

    if !options.refresh
        && let Some(hit) = previous.as_ref()
    {
        tracing::info!("consultation cache hit for {}", key);
        return Ok(ConsultationOutcome::from_stored(hit.clone(), true, None));
    }

    let consultation = engine::consult(&context);
    let stored = StoredConsultation::new(context, consultation);
    let progress = previous
        .as_ref()
        .map(|prev| compare_progress(prev, &stored));

    store.set(key, stored.clone()).await?;
    tracing::info!(
        "consultation stored for {} (primary={}, refresh={})",
        key,
        stored.consultation.primary_focus,
        options.refresh
    );

    Ok(ConsultationOutcome::from_stored(stored, false, progress))
}

/// Fetch a fresh cached consultation for the identity in `raw`.
pub async fn lookup(
    store: &dyn ConsultationStore,
    raw: &RawBusinessContext,
) -> Result<StoredConsultation> {
    let context = engine::normalize(raw);
    let key = cache_key(&context);
    store.get(&key).await?.ok_or_else(|| EpicConsultError::NotFound {
        message: format!("no cached consultation for '{}'", key),
    })
}
