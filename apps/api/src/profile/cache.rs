//! Profile Cache — analysis results keyed by a SHA-256 fingerprint of the uploaded bytes.
//!
//! A re-upload of the same document reuses its Profile; a changed document has a new
//! fingerprint and gets a fresh analysis. Nothing here outlives the process, and the
//! number of cached documents is capped (`MAX_CACHED_PROFILES`).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::profile::Profile;

/// Lowercase hex SHA-256 of the document bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedProfile {
    pub fingerprint: String,
    pub file_name: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub analyzed_at: DateTime<Utc>,
}

/// Bounded by `capacity`: inserting a new document into a full cache evicts the
/// entry with the oldest `analyzed_at`.
#[derive(Clone)]
pub struct ProfileCache {
    entries: Arc<RwLock<HashMap<String, CachedProfile>>>,
    capacity: usize,
}

impl ProfileCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    pub async fn get(&self, fingerprint: &str) -> Option<CachedProfile> {
        self.entries.read().await.get(fingerprint).cloned()
    }

    /// Stores a complete analysis, replacing any previous one for the same document.
    pub async fn insert(&self, cached: CachedProfile) {
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&cached.fingerprint) && entries.len() >= self.capacity {
            let oldest = entries
                .values()
                .min_by_key(|entry| entry.analyzed_at)
                .map(|entry| entry.fingerprint.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                debug!("Evicted cached profile {}", oldest);
            }
        }

        entries.insert(cached.fingerprint.clone(), cached);
    }

    /// Drops the cached analysis. Returns whether anything was cached.
    pub async fn invalidate(&self, fingerprint: &str) -> bool {
        self.entries.write().await.remove(fingerprint).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
