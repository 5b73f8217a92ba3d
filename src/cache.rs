use std::{future::Future, time::Duration};

use axum::http::StatusCode;
use serde_json::Value;

use crate::error::AppResult;

#[derive(Clone)]
struct CachedResponse {
    status: u16,
    body: Value,
    stored_at: i64,
    ttl_secs: i64,
}

/// Read-through cache for the idempotent provider endpoints, keyed by the
/// request signature. Entries carry their own TTL; freshness is checked on
/// read rather than delegated to eviction.
#[derive(Clone)]
pub struct ResponseCache {
    entries: moka::future::Cache<String, CachedResponse>,
}

impl ResponseCache {
    pub fn new(max_entries: u64) -> Self {
        Self { entries: moka::future::Cache::new(max_entries) }
    }

    pub async fn get(&self, key: &str) -> Option<(StatusCode, Value)> {
        let entry = self.entries.get(key).await?;
        if !is_fresh(entry.stored_at, entry.ttl_secs, now_sec()) {
            self.entries.invalidate(key).await;
            return None;
        }
        StatusCode::from_u16(entry.status).ok().map(|status| (status, entry.body))
    }

    pub async fn put(&self, key: String, status: StatusCode, body: Value, ttl: Duration) {
        let entry = CachedResponse {
            status: status.as_u16(),
            body,
            stored_at: now_sec(),
            ttl_secs: ttl.as_secs() as i64,
        };
        self.entries.insert(key, entry).await;
    }

    /// Cache-aside wrapper: a fresh hit replays the stored response without
    /// invoking `fetch`; a miss runs `fetch`, stores a successful body under
    /// `key` and returns it. Failed fetches pass through unstored.
    pub async fn cached<F, Fut>(
        &self,
        key: String,
        ttl: Duration,
        fetch: F,
    ) -> AppResult<(StatusCode, Value)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Value>>,
    {
        if let Some(hit) = self.get(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let body = fetch().await?;
        self.put(key, StatusCode::OK, body.clone(), ttl).await;
        Ok((StatusCode::OK, body))
    }
}

/// Deterministic request signature: path plus query pairs sorted by name, so
/// parameter order does not fragment the cache.
pub fn request_signature(path: &str, params: &[(&str, String)]) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    format!("{path}?{}", pairs.join("&"))
}

fn is_fresh(stored_at: i64, ttl_secs: i64, now: i64) -> bool {
    now.saturating_sub(stored_at) <= ttl_secs
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
