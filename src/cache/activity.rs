//! Per-user liked units and download history kept in the local cache

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::local::*;
use crate::config::CacheConfig;
use crate::traits::*;
use crate::types::*;

/// Units a user has liked
pub struct LikesStore<'a, S: CacheStorage> {
    cache: &'a LocalCache<S>,
    ttl: Option<Duration>,
}

impl<'a, S: CacheStorage> LikesStore<'a, S> {
    pub fn new(cache: &'a LocalCache<S>, config: &CacheConfig) -> Self {
        Self {
            cache,
            ttl: config.likes_ttl_secs.and_then(ttl_from_secs),
        }
    }

    fn load(&self, user_id: &str) -> CrmResult<BTreeSet<String>> {
        Ok(self
            .cache
            .read(&CacheKey::likes(user_id))?
            .unwrap_or_default())
    }

    /// Flip the like on a unit, returning whether it is now liked
    pub fn toggle(&self, user_id: &str, unit_id: &str) -> CrmResult<bool> {
        let mut liked = self.load(user_id)?;
        let now_liked = if liked.remove(unit_id) {
            false
        } else {
            liked.insert(unit_id.to_string());
            true
        };
        self.cache
            .write(&CacheKey::likes(user_id), &liked, self.ttl)?;
        Ok(now_liked)
    }

    pub fn is_liked(&self, user_id: &str, unit_id: &str) -> CrmResult<bool> {
        Ok(self.load(user_id)?.contains(unit_id))
    }

    /// Liked unit ids in sorted order
    pub fn liked(&self, user_id: &str) -> CrmResult<Vec<String>> {
        Ok(self.load(user_id)?.into_iter().collect())
    }

    pub fn count(&self, user_id: &str) -> CrmResult<usize> {
        Ok(self.load(user_id)?.len())
    }
}

/// One document download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    pub id: Uuid,
    pub document_id: String,
    pub downloaded_at: DateTime<Utc>,
}

/// Bounded per-user download history, oldest first
pub struct DownloadLog<'a, S: CacheStorage> {
    cache: &'a LocalCache<S>,
    ttl: Option<Duration>,
    max_entries: usize,
}

impl<'a, S: CacheStorage> DownloadLog<'a, S> {
    pub fn new(cache: &'a LocalCache<S>, config: &CacheConfig) -> Self {
        Self {
            cache,
            ttl: config.downloads_ttl_secs.and_then(ttl_from_secs),
            max_entries: config.max_download_entries.max(1),
        }
    }

    /// Append a download, dropping the oldest entries past the limit
    pub fn record(&self, user_id: &str, document_id: &str) -> CrmResult<DownloadRecord> {
        if document_id.trim().is_empty() {
            return Err(CrmError::Validation(
                "Document ID cannot be empty".to_string(),
            ));
        }

        let record = DownloadRecord {
            id: Uuid::new_v4(),
            document_id: document_id.to_string(),
            downloaded_at: self.cache.now(),
        };

        let mut entries = self.entries(user_id)?;
        entries.push(record.clone());
        if entries.len() > self.max_entries {
            let overflow = entries.len() - self.max_entries;
            entries.drain(..overflow);
        }

        self.cache
            .write(&CacheKey::downloads(user_id), &entries, self.ttl)?;
        Ok(record)
    }

    pub fn entries(&self, user_id: &str) -> CrmResult<Vec<DownloadRecord>> {
        Ok(self
            .cache
            .read(&CacheKey::downloads(user_id))?
            .unwrap_or_default())
    }

    /// How many times a user downloaded one document
    pub fn count_for(&self, user_id: &str, document_id: &str) -> CrmResult<usize> {
        Ok(self
            .entries(user_id)?
            .iter()
            .filter(|record| record.document_id == document_id)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ManualClock, MemoryStorage};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn cache(config: &CacheConfig) -> (LocalCache<MemoryStorage>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let cache = LocalCache::with_clock(MemoryStorage::new(), config, Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_toggle_likes() {
        let config = CacheConfig::default();
        let (cache, _) = cache(&config);
        let likes = LikesStore::new(&cache, &config);

        assert!(likes.toggle("u1", "unit-9").unwrap());
        assert!(likes.toggle("u1", "unit-3").unwrap());
        assert!(likes.is_liked("u1", "unit-9").unwrap());
        assert_eq!(likes.liked("u1").unwrap(), vec!["unit-3", "unit-9"]);

        assert!(!likes.toggle("u1", "unit-9").unwrap());
        assert_eq!(likes.count("u1").unwrap(), 1);
        // other users are unaffected
        assert_eq!(likes.count("u2").unwrap(), 0);
    }

    #[test]
    fn test_likes_expire() {
        let config = CacheConfig {
            likes_ttl_secs: Some(3600),
            ..CacheConfig::default()
        };
        let (cache, clock) = cache(&config);
        let likes = LikesStore::new(&cache, &config);

        likes.toggle("u1", "unit-1").unwrap();
        clock.advance(Duration::try_hours(2).unwrap());
        assert!(!likes.is_liked("u1", "unit-1").unwrap());
    }

    #[test]
    fn test_download_log_is_bounded() {
        let config = CacheConfig {
            max_download_entries: 3,
            ..CacheConfig::default()
        };
        let (cache, clock) = cache(&config);
        let log = DownloadLog::new(&cache, &config);

        for doc in ["brochure", "floor-plan", "brochure", "price-sheet"] {
            log.record("u1", doc).unwrap();
            clock.advance(Duration::try_minutes(1).unwrap());
        }

        let entries = log.entries("u1").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].document_id, "floor-plan");
        assert!(entries[0].downloaded_at < entries[2].downloaded_at);
        assert_eq!(log.count_for("u1", "brochure").unwrap(), 1);
    }

    #[test]
    fn test_empty_document_rejected() {
        let config = CacheConfig::default();
        let (cache, _) = cache(&config);
        let log = DownloadLog::new(&cache, &config);

        assert!(matches!(
            log.record("u1", ""),
            Err(CrmError::Validation(_))
        ));
    }
}
