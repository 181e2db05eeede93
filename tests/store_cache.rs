use chrono::{Duration, Utc};
use epic_consult::engine::{self, EpicLetter, RawBusinessContext};
use epic_consult::error::EpicConsultError;
use epic_consult::store::{
    ConsultOptions, ConsultationStore, InMemoryConsultationStore, JsonFileConsultationStore,
    StoredConsultation, cache_key, consult_with_cache, lookup,
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::tempdir;

fn acme(challenge: &str) -> RawBusinessContext {
    RawBusinessContext {
        company_name: Some("Acme".into()),
        industry: Some("SaaS".into()),
        business_stage: Some("venture-seed".into()),
        challenge_text: Some(challenge.into()),
        ..Default::default()
    }
}

fn stored(raw: &RawBusinessContext) -> StoredConsultation {
    let ctx = engine::normalize(raw);
    let consultation = engine::consult(&ctx);
    StoredConsultation::new(ctx, consultation)
}

#[tokio::test]
async fn memory_store_roundtrip_and_remove() {
    let store = InMemoryConsultationStore::new(10, Duration::days(30));
    let entry = stored(&acme("onboarding"));
    let key = entry.cache_key.clone();

    store.set(&key, entry.clone()).await.expect("set");
    assert_eq!(store.len().await, 1);
    assert_eq!(store.get(&key).await.expect("get"), Some(entry));
    assert!(store.remove(&key).await.expect("remove"));
    assert!(!store.remove(&key).await.expect("remove"));
    assert_eq!(store.get(&key).await.expect("get"), None);
}

#[tokio::test]
async fn memory_store_evicts_least_recently_used() {
    let store = InMemoryConsultationStore::new(2, Duration::days(30));
    for name in ["a", "b", "c"] {
        let raw = RawBusinessContext {
            company_name: Some(name.into()),
            ..Default::default()
        };
        let entry = stored(&raw);
        store.set(&entry.cache_key.clone(), entry).await.expect("set");
    }
    assert_eq!(store.len().await, 2);
    assert!(store.get("a-general-mid-market").await.expect("get").is_none());
    assert!(store.get("c-general-mid-market").await.expect("get").is_some());
}

#[tokio::test]
async fn expired_entries_read_as_absent() {
    let store = InMemoryConsultationStore::new(10, Duration::days(30));
    let mut entry = stored(&acme("onboarding"));
    entry.created_at = Utc::now() - Duration::days(31);
    let key = entry.cache_key.clone();
    store.set(&key, entry).await.expect("set");

    assert_eq!(store.get(&key).await.expect("get"), None);
    // evicted on read
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn cache_aside_hits_then_refreshes_with_progress() {
    let store = InMemoryConsultationStore::new(10, Duration::days(30));

    let first = consult_with_cache(&store, &acme("onboarding"), ConsultOptions::default())
        .await
        .expect("first consult");
    assert!(!first.cached);
    assert!(first.progress.is_none());
    assert_eq!(first.cache_key, "acme-saas-venture-seed");

    let second = consult_with_cache(&store, &acme("onboarding"), ConsultOptions::default())
        .await
        .expect("second consult");
    assert!(second.cached);
    assert_eq!(second.consultation_id, first.consultation_id);

    // same identity, new challenge: only a refresh recomputes
    let refreshed = consult_with_cache(
        &store,
        &acme("onboarding and community events"),
        ConsultOptions { refresh: true },
    )
    .await
    .expect("refresh");
    assert!(!refreshed.cached);
    assert_ne!(refreshed.consultation_id, first.consultation_id);
    let progress = refreshed.progress.expect("progress attached");
    assert_eq!(progress.previous_consultation_id, first.consultation_id);
    assert_eq!(progress.score_deltas.c, 2);
    assert_eq!(progress.improved, vec![EpicLetter::C]);
    assert!(progress.declined.is_empty());
    assert!(!progress.focus_changed);

    let found = lookup(&store, &acme("")).await.expect("lookup");
    assert_eq!(found.id, refreshed.consultation_id);
}

#[tokio::test]
async fn lookup_missing_is_not_found() {
    let store = InMemoryConsultationStore::new(10, Duration::days(30));
    let err = lookup(&store, &acme("")).await.expect_err("nothing cached");
    assert!(matches!(err, EpicConsultError::NotFound { .. }));
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let raw = acme("product-led onboarding");
    let key = cache_key(&engine::normalize(&raw));

    let id = {
        let store = JsonFileConsultationStore::open(&path, Duration::days(30), 100)
            .await
            .expect("open");
        let outcome = consult_with_cache(&store, &raw, ConsultOptions::default())
            .await
            .expect("consult");
        store.close().await.expect("close");
        outcome.consultation_id
    };

    let reopened = JsonFileConsultationStore::open(&path, Duration::days(30), 100)
        .await
        .expect("reopen");
    let entry = reopened.get(&key).await.expect("get").expect("persisted");
    assert_eq!(entry.id, id);
    assert_eq!(entry.consultation.primary_focus, EpicLetter::P);
}

#[tokio::test]
async fn file_store_drops_expired_on_open() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let mut entry = stored(&acme("seo"));
    entry.created_at = Utc::now() - Duration::days(45);
    let on_disk = HashMap::from([(entry.cache_key.clone(), entry)]);
    let body = serde_json::to_string(&on_disk).expect("serialize");
    tokio::fs::write(&path, body).await.expect("write");

    let reopened = JsonFileConsultationStore::open(&path, Duration::days(30), 100)
        .await
        .expect("reopen");
    assert_eq!(reopened.len().await, 0);
}

#[tokio::test]
async fn file_store_rejects_corrupt_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    tokio::fs::write(&path, b"{ not json").await.expect("write");
    let result = JsonFileConsultationStore::open(&path, Duration::days(30), 100).await;
    assert!(matches!(result, Err(EpicConsultError::Store { .. })));
}

#[tokio::test]
async fn file_store_failed_write_is_not_served_from_memory() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("no-such-dir").join("store.json");
    let store = JsonFileConsultationStore::open(&path, Duration::days(30), 100)
        .await
        .expect("open");
    let raw = acme("onboarding");

    let first = consult_with_cache(&store, &raw, ConsultOptions::default()).await;
    assert!(first.is_err());

    // still a miss, and still failing to persist
    let second = consult_with_cache(&store, &raw, ConsultOptions::default()).await;
    assert!(second.is_err());
    assert_eq!(store.len().await, 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn file_store_prunes_expired_entries() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let store = JsonFileConsultationStore::open(&path, Duration::days(30), 100)
        .await
        .expect("open");
    let fresh = stored(&acme("seo"));
    store.set(&fresh.cache_key.clone(), fresh).await.expect("set");

    let mut stale = stored(&RawBusinessContext {
        company_name: Some("Old Co".into()),
        ..Default::default()
    });
    stale.created_at = Utc::now() - Duration::days(60);
    let stale_key = stale.cache_key.clone();
    store.set(&stale_key, stale).await.expect("set");

    // expired entries are pruned on write
    assert_eq!(store.len().await, 1);
    assert!(store.get(&stale_key).await.expect("get").is_none());
    let on_disk = tokio::fs::read_to_string(&path).await.expect("read");
    assert!(!on_disk.contains(&stale_key));
}

#[tokio::test]
async fn file_store_keeps_newest_within_cache_max() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let store = JsonFileConsultationStore::open(&path, Duration::days(30), 2)
        .await
        .expect("open");
    for (name, age) in [("a", 3), ("b", 2), ("c", 1)] {
        let mut entry = stored(&RawBusinessContext {
            company_name: Some(name.into()),
            ..Default::default()
        });
        entry.created_at = Utc::now() - Duration::days(age);
        store.set(&entry.cache_key.clone(), entry).await.expect("set");
    }
    assert_eq!(store.len().await, 2);
    assert!(store.get("a-general-mid-market").await.expect("get").is_none());
    assert!(store.get("c-general-mid-market").await.expect("get").is_some());

    // the cap also applies to what a reopen loads
    drop(store);
    let reopened = JsonFileConsultationStore::open(&path, Duration::days(30), 1)
        .await
        .expect("reopen");
    assert_eq!(reopened.len().await, 1);
    assert!(reopened.get("c-general-mid-market").await.expect("get").is_some());
}

#[tokio::test]
async fn concurrent_identical_requests_compute_once() {
    let store: Arc<dyn ConsultationStore> =
        Arc::new(InMemoryConsultationStore::new(10, Duration::days(30)));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            consult_with_cache(store.as_ref(), &acme("inbound leads"), ConsultOptions::default())
                .await
        }));
    }
    let mut outcomes = Vec::new();
    for h in handles {
        outcomes.push(h.await.expect("join").expect("consult"));
    }
    assert_eq!(store.len().await, 1);

    let key = outcomes[0].cache_key.clone();
    let kept = store.get(&key).await.expect("get").expect("stored");
    assert_eq!(outcomes.iter().filter(|o| !o.cached).count(), 1);
    for outcome in &outcomes {
        assert_eq!(outcome.consultation_id, kept.id);
    }
}
