//! Typed local cache with expiry

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::config::CacheConfig;
use crate::traits::*;
use crate::types::*;

/// Groups of cached data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Units a user marked as liked
    Likes,
    /// Brochures and documents a user downloaded
    Downloads,
    /// Anything else the application wants to cache
    Named(NamespaceName),
}

/// Application-chosen namespace name, built through [`CacheNamespace::named`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(String);

impl NamespaceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CacheNamespace {
    /// A custom namespace; must be non-empty, free of `:` and not a built-in name
    pub fn named(name: impl Into<String>) -> CrmResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CrmError::Validation(
                "Cache namespace cannot be empty".to_string(),
            ));
        }
        if name.contains(':') {
            return Err(CrmError::Validation(format!(
                "Cache namespace '{}' cannot contain ':'",
                name
            )));
        }
        if name == "likes" || name == "downloads" {
            return Err(CrmError::Validation(format!(
                "Cache namespace '{}' is reserved",
                name
            )));
        }
        Ok(CacheNamespace::Named(NamespaceName(name)))
    }

    pub fn as_str(&self) -> &str {
        match self {
            CacheNamespace::Likes => "likes",
            CacheNamespace::Downloads => "downloads",
            CacheNamespace::Named(name) => name.as_str(),
        }
    }
}

/// Structured cache key, rendered as `namespace:scope`
///
/// `%` and `:` in the scope are percent-escaped so distinct keys never
/// render to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: CacheNamespace,
    pub scope: String,
}

impl CacheKey {
    pub fn new(namespace: CacheNamespace, scope: impl Into<String>) -> Self {
        Self {
            namespace,
            scope: scope.into(),
        }
    }

    pub fn likes(user_id: &str) -> Self {
        Self::new(CacheNamespace::Likes, user_id)
    }

    pub fn downloads(user_id: &str) -> Self {
        Self::new(CacheNamespace::Downloads, user_id)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.namespace.as_str())?;
        for ch in self.scope.chars() {
            match ch {
                '%' => f.write_str("%25")?,
                ':' => f.write_str("%3A")?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

/// Convert a configured TTL in seconds, `None` when out of range
pub fn ttl_from_secs(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}

/// Typed read/write over a [`CacheStorage`]
pub struct LocalCache<S: CacheStorage> {
    storage: S,
    clock: Arc<dyn Clock>,
    default_ttl: Option<Duration>,
}

impl<S: CacheStorage> LocalCache<S> {
    /// Create a cache that uses the wall clock
    pub fn new(storage: S, config: &CacheConfig) -> Self {
        Self::with_clock(storage, config, Arc::new(SystemClock))
    }

    /// Create a cache with a custom time source
    pub fn with_clock(storage: S, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            default_ttl: config.default_ttl_secs.and_then(ttl_from_secs),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Read a value; expired or unreadable entries come back as `None`
    pub fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> CrmResult<Option<T>> {
        let key = key.to_string();
        let Some(entry) = self.storage.get_entry(&key)? else {
            return Ok(None);
        };

        if entry.is_expired(self.now()) {
            trace!(%key, "dropping expired cache entry");
            self.storage.remove_entry(&key)?;
            return Ok(None);
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(%key, %error, "discarding unreadable cache entry");
                self.storage.remove_entry(&key)?;
                Ok(None)
            }
        }
    }

    /// Write a value; `ttl` overrides the configured default
    pub fn write<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<Duration>,
    ) -> CrmResult<()> {
        let expires_at = ttl
            .or(self.default_ttl)
            .and_then(|ttl| self.now().checked_add_signed(ttl));
        let entry = CacheEntry {
            value: serde_json::to_value(value)?,
            expires_at,
        };
        self.storage.set_entry(&key.to_string(), entry)
    }

    pub fn remove(&self, key: &CacheKey) -> CrmResult<bool> {
        self.storage.remove_entry(&key.to_string())
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> CrmResult<usize> {
        let now = self.now();
        let mut removed = 0;
        for key in self.storage.keys()? {
            if let Some(entry) = self.storage.get_entry(&key)? {
                if entry.is_expired(now) && self.storage.remove_entry(&key)? {
                    removed += 1;
                }
            }
        }
        trace!(removed, "purged expired cache entries");
        Ok(removed)
    }
}
