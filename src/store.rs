//! In-memory holding area for finished extractions
//!
//! The result page links to download endpoints, so a report has to outlive
//! the request that produced it. Reports are kept in a bounded LRU and
//! expire after a fixed time; nothing is written to disk.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ResultsConfig;
use crate::extract::ExtractionReport;

struct StoredReport {
    report: Arc<ExtractionReport>,
    expires_at: DateTime<Utc>,
}

/// Bounded, expiring store of extraction reports keyed by id
#[derive(Clone)]
pub struct ResultStore {
    entries: Arc<RwLock<LruCache<Uuid, StoredReport>>>,
    ttl: Duration,
}

impl ResultStore {
    pub fn new(config: &ResultsConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            ttl: Duration::try_seconds(config.ttl_secs.max(1)).unwrap_or(Duration::MAX),
        }
    }

    /// Store a report and return its id
    pub async fn insert(&self, report: Arc<ExtractionReport>) -> Uuid {
        let id = Uuid::new_v4();
        let stored = StoredReport {
            report,
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut entries = self.entries.write().await;
        if let Some((evicted, _)) = entries.push(id, stored) {
            if evicted != id {
                tracing::debug!(%evicted, "Result store full, evicted oldest report");
            }
        }
        id
    }

    /// Look up a report; expired entries are dropped
    pub async fn get(&self, id: &Uuid) -> Option<Arc<ExtractionReport>> {
        let mut entries = self.entries.write().await;
        let expired = match entries.get(id) {
            Some(stored) if stored.expires_at > Utc::now() => {
                return Some(Arc::clone(&stored.report));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(id);
            tracing::debug!(%id, "Result expired");
        }
        None
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
