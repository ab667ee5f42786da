//! Runtime configuration for the CRM core

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;

/// Top-level configuration; every section falls back to its defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    pub pagination: PaginationConfig,
    pub cache: CacheConfig,
}

/// Page size settings for dashboard tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Rows per page when the caller does not choose
    pub default_page_size: usize,
    /// Upper bound for caller-chosen page sizes
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Local cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for entries written without one; `None` keeps them forever
    pub default_ttl_secs: Option<u64>,
    /// TTL for liked-unit sets
    pub likes_ttl_secs: Option<u64>,
    /// TTL for download logs
    pub downloads_ttl_secs: Option<u64>,
    /// Download log entries kept per user
    pub max_download_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: None,
            likes_ttl_secs: None,
            downloads_ttl_secs: None,
            max_download_entries: 100,
        }
    }
}

impl CrmConfig {
    /// Parse and validate configuration from JSON text
    pub fn from_json_str(raw: &str) -> CrmResult<Self> {
        let config: CrmConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> CrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CrmError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> CrmResult<()> {
        if self.pagination.default_page_size == 0 {
            return Err(CrmError::Config(
                "pagination.default_page_size must be at least 1".to_string(),
            ));
        }

        if self.pagination.max_page_size < self.pagination.default_page_size {
            return Err(CrmError::Config(format!(
                "pagination.max_page_size ({}) is smaller than default_page_size ({})",
                self.pagination.max_page_size, self.pagination.default_page_size
            )));
        }

        if self.cache.max_download_entries == 0 {
            return Err(CrmError::Config(
                "cache.max_download_entries must be at least 1".to_string(),
            ));
        }

        let ttls = [
            ("cache.default_ttl_secs", self.cache.default_ttl_secs),
            ("cache.likes_ttl_secs", self.cache.likes_ttl_secs),
            ("cache.downloads_ttl_secs", self.cache.downloads_ttl_secs),
        ];
        for (name, ttl) in ttls {
            if ttl == Some(0) {
                return Err(CrmError::Config(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CrmConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CrmConfig::default());
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.cache.max_download_entries, 100);
    }

    #[test]
    fn test_partial_override() {
        let config = CrmConfig::from_json_str(
            r#"{"pagination": {"default_page_size": 25}, "cache": {"likes_ttl_secs": 3600}}"#,
        )
        .unwrap();
        assert_eq!(config.pagination.default_page_size, 25);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.cache.likes_ttl_secs, Some(3600));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            CrmConfig::from_json_str(r#"{"pagination": {"default_page_size": 0}}"#),
            Err(CrmError::Config(_))
        ));
        assert!(matches!(
            CrmConfig::from_json_str(r#"{"pagination": {"default_page_size": 50, "max_page_size": 20}}"#),
            Err(CrmError::Config(_))
        ));
        assert!(matches!(
            CrmConfig::from_json_str(r#"{"cache": {"default_ttl_secs": 0}}"#),
            Err(CrmError::Config(_))
        ));
        assert!(matches!(
            CrmConfig::from_json_str("not json"),
            Err(CrmError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CrmConfig::from_path("/nonexistent/crm.json"),
            Err(CrmError::Config(_))
        ));
    }
}
