//! Environment-driven configuration.
//!
//! Cache directory precedence (first non-empty value wins):
//!
//! 1. `MARKET_DATA_CACHE_DIR`, used as given
//! 2. `alfred_workflow_cache` + `/market-data`
//! 3. `alfred_workflow_data` + `/market-data`
//! 4. the process temporary directory + `/alfred-market-data`

use std::path::PathBuf;
use std::time::Duration;

use log::warn;

pub const CACHE_DIR_ENV: &str = "MARKET_DATA_CACHE_DIR";
pub const ALFRED_CACHE_ENV: &str = "alfred_workflow_cache";
pub const ALFRED_DATA_ENV: &str = "alfred_workflow_data";
pub const HTTP_TIMEOUT_ENV: &str = "MARKET_DATA_HTTP_TIMEOUT_SECS";

const WORKFLOW_SUBDIR: &str = "market-data";
const TEMP_SUBDIR: &str = "alfred-market-data";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the cache directory came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheDirSource {
    Override,
    WorkflowCache,
    WorkflowData,
    TempDir,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    pub cache_dir: PathBuf,
    pub cache_dir_source: CacheDirSource,
    pub http_timeout: Duration,
}

impl MarketConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (cache_dir, cache_dir_source) = if let Some(dir) = non_empty(CACHE_DIR_ENV) {
            (PathBuf::from(dir), CacheDirSource::Override)
        } else if let Some(dir) = non_empty(ALFRED_CACHE_ENV) {
            (
                PathBuf::from(dir).join(WORKFLOW_SUBDIR),
                CacheDirSource::WorkflowCache,
            )
        } else if let Some(dir) = non_empty(ALFRED_DATA_ENV) {
            (
                PathBuf::from(dir).join(WORKFLOW_SUBDIR),
                CacheDirSource::WorkflowData,
            )
        } else {
            (
                std::env::temp_dir().join(TEMP_SUBDIR),
                CacheDirSource::TempDir,
            )
        };

        let http_timeout = match non_empty(HTTP_TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "Ignoring invalid {}={:?}, using {:?}",
                        HTTP_TIMEOUT_ENV, raw, DEFAULT_HTTP_TIMEOUT
                    );
                    DEFAULT_HTTP_TIMEOUT
                }
            },
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Self {
            cache_dir,
            cache_dir_source,
            http_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> MarketConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MarketConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_override_wins() {
        let cfg = config(&[
            (CACHE_DIR_ENV, "/tmp/override"),
            (ALFRED_CACHE_ENV, "/alfred/cache"),
            (ALFRED_DATA_ENV, "/alfred/data"),
        ]);
        assert_eq!(cfg.cache_dir, PathBuf::from("/tmp/override"));
        assert_eq!(cfg.cache_dir_source, CacheDirSource::Override);
    }

    #[test]
    fn test_workflow_cache_before_data() {
        let cfg = config(&[
            (ALFRED_CACHE_ENV, "/alfred/cache"),
            (ALFRED_DATA_ENV, "/alfred/data"),
        ]);
        assert_eq!(cfg.cache_dir, PathBuf::from("/alfred/cache/market-data"));
        assert_eq!(cfg.cache_dir_source, CacheDirSource::WorkflowCache);
    }

    #[test]
    fn test_workflow_data() {
        let cfg = config(&[(ALFRED_DATA_ENV, "/alfred/data")]);
        assert_eq!(cfg.cache_dir, PathBuf::from("/alfred/data/market-data"));
        assert_eq!(cfg.cache_dir_source, CacheDirSource::WorkflowData);
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let cfg = config(&[(CACHE_DIR_ENV, "  "), (ALFRED_CACHE_ENV, "")]);
        assert_eq!(cfg.cache_dir, std::env::temp_dir().join("alfred-market-data"));
        assert_eq!(cfg.cache_dir_source, CacheDirSource::TempDir);
    }

    #[test]
    fn test_http_timeout() {
        assert_eq!(config(&[]).http_timeout, Duration::from_secs(10));
        assert_eq!(
            config(&[(HTTP_TIMEOUT_ENV, "3")]).http_timeout,
            Duration::from_secs(3)
        );
        assert_eq!(
            config(&[(HTTP_TIMEOUT_ENV, "0")]).http_timeout,
            Duration::from_secs(10)
        );
        assert_eq!(
            config(&[(HTTP_TIMEOUT_ENV, "soon")]).http_timeout,
            Duration::from_secs(10)
        );
    }
}
