use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gw_chain::{AuditRecord, ChainLogClient};
use tokio::sync::RwLock;

use crate::error::CacheError;
use crate::types::{CacheStats, TagCount};

const CHAIN_PRINCIPAL_PREFIX: &str = "principal:";

/// Lazily rebuilt secondary indices over the projection. Invalidated by
/// [`ChainLogCache::refresh`]; rebuilt on the first query that follows.
struct Indices {
    tag_counts: HashMap<String, usize>,
    unique_users: HashSet<String>,
}

impl Indices {
    fn build(records: &[AuditRecord]) -> Self {
        let mut tag_counts = HashMap::new();
        let mut unique_users = HashSet::new();

        for record in records {
            for token in record.tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if let Some(user) = token.strip_prefix(CHAIN_PRINCIPAL_PREFIX) {
                    unique_users.insert(user.to_string());
                } else {
                    *tag_counts.entry(token.to_string()).or_insert(0) += 1;
                }
            }
        }

        Self { tag_counts, unique_users }
    }
}

/// In-memory, eventually-consistent projection of the audit log.
///
/// Reads never block writes for long: `refresh` is the only writer and holds
/// the lock only long enough to append the batch it fetched.
pub struct ChainLogCache {
    client: std::sync::Arc<ChainLogClient>,
    records: RwLock<Vec<AuditRecord>>,
    indices: Mutex<Option<Indices>>,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    refresh_batch_cap: u64,
}

impl ChainLogCache {
    pub fn new(client: std::sync::Arc<ChainLogClient>) -> Self {
        Self {
            client,
            records: RwLock::new(Vec::new()),
            indices: Mutex::new(None),
            last_sync: Mutex::new(None),
            refresh_batch_cap: 500,
        }
    }

    /// Fetch any records with `id` beyond what's already projected and
    /// append them. Returns how many were added.
    pub async fn refresh(&self) -> Result<usize, CacheError> {
        let known = self.records.read().await.len() as u64;
        let total = self.client.get_total().await?;

        if total <= known {
            *self.last_sync.lock().expect("poisoned") = Some(Utc::now());
            return Ok(0);
        }

        let end = total.min(known + self.refresh_batch_cap);
        let mut fetched = Vec::with_capacity((end - known) as usize);
        for id in known..end {
            fetched.push(self.client.get_by_id(id).await?);
        }

        let added = fetched.len();
        {
            let mut records = self.records.write().await;
            records.extend(fetched);
        }
        *self.indices.lock().expect("poisoned") = None;
        *self.last_sync.lock().expect("poisoned") = Some(Utc::now());
        Ok(added)
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock().expect("poisoned")
    }

    pub async fn stats(&self) -> CacheStats {
        let records = self.records.read().await;
        self.with_indices(&records, |indices| CacheStats {
            total: records.len(),
            inserts: records.iter().filter(|r| r.op_type == 0).count(),
            searches: records.iter().filter(|r| r.op_type == 1).count(),
            unique_tags: indices.tag_counts.len(),
            unique_users: indices.unique_users.len(),
        })
    }

    /// Substring match against the raw `tags` field (includes the
    /// `principal:` token if present); case-insensitive on the words, not on
    /// the separating punctuation.
    pub async fn search_by_tags(&self, needle: &str, limit: usize) -> Vec<AuditRecord> {
        let needle_lower = needle.to_lowercase();
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| r.tags.to_lowercase().contains(&needle_lower))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn search_by_title(
        &self,
        substr: &str,
        limit: usize,
        op_type: Option<u8>,
    ) -> Vec<AuditRecord> {
        let needle_lower = substr.to_lowercase();
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| r.title.to_lowercase().contains(&needle_lower))
            .filter(|r| op_type.is_none_or(|want| r.op_type == want))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn recent(&self, limit: usize) -> Vec<AuditRecord> {
        let records = self.records.read().await;
        records.iter().rev().take(limit).cloned().collect()
    }

    pub async fn trending_tags(&self, limit: usize) -> Vec<TagCount> {
        let records = self.records.read().await;
        self.with_indices(&records, |indices| {
            let mut ranked: Vec<TagCount> = indices
                .tag_counts
                .iter()
                .map(|(tag, count)| TagCount {
                    tag: tag.clone(),
                    count: *count,
                })
                .collect();
            ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.tag.cmp(&b.tag)));
            ranked.truncate(limit);
            ranked
        })
    }

    fn with_indices<T>(&self, records: &[AuditRecord], f: impl FnOnce(&Indices) -> T) -> T {
        let mut guard = self.indices.lock().expect("poisoned");
        if guard.is_none() {
            *guard = Some(Indices::build(records));
        }
        f(guard.as_ref().expect("just populated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_chain::ChainConfig;

    fn record(id: u64, op_type: u8, title: &str, tags: &str) -> AuditRecord {
        AuditRecord {
            id,
            user: "0xabc".into(),
            op_type,
            title: title.into(),
            summary: String::new(),
            tags: tags.into(),
            content_hash: format!("0x{}", "0".repeat(64)),
            timestamp: Utc::now(),
        }
    }

    fn cache_with(records: Vec<AuditRecord>) -> ChainLogCache {
        let client = std::sync::Arc::new(
            ChainLogClient::new(ChainConfig {
                contract_address: "0x0000000000000000000000000000000000000001".into(),
                ..ChainConfig::default()
            })
            .unwrap(),
        );
        let cache = ChainLogCache::new(client);
        cache.records = RwLock::new(records);
        cache
    }

    #[tokio::test]
    async fn trending_tags_excludes_principal_tokens() {
        let cache = cache_with(vec![
            record(1, 0, "a", "ml,research,principal:x"),
            record(2, 0, "b", "ml,ai,principal:y"),
            record(3, 0, "c", "ai,principal:z"),
        ]);
        let trending = cache.trending_tags(3).await;
        let tags: Vec<&str> = trending.iter().map(|t| t.tag.as_str()).collect();
        assert!(!tags.iter().any(|t| t.starts_with("principal:")));
        assert_eq!(trending[0].count, 2);
    }

    #[tokio::test]
    async fn stats_split_by_op_type() {
        let cache = cache_with(vec![
            record(1, 0, "a", "ml,principal:x"),
            record(2, 1, "b", "ai,principal:x"),
        ]);
        let stats = cache.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.searches, 1);
        assert_eq!(stats.unique_users, 1);
    }

    #[tokio::test]
    async fn recent_orders_by_descending_id() {
        let cache = cache_with(vec![record(1, 0, "a", ""), record(2, 0, "b", "")]);
        let recent = cache.recent(2).await;
        assert_eq!(recent[0].id, 2);
        assert_eq!(recent[1].id, 1);
    }

    #[tokio::test]
    async fn search_by_title_is_case_insensitive() {
        let cache = cache_with(vec![record(1, 0, "Jolt Atlas", "")]);
        let hits = cache.search_by_title("jolt", 10, None).await;
        assert_eq!(hits.len(), 1);
    }
}
