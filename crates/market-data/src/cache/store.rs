use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{MarketKind, ProviderId, QuoteResult, UnitPrice, MAX_UNIT_PRICE};

/// How far in the future a record may be stamped and still count as fresh.
const MAX_FUTURE_SKEW_MINUTES: i64 = 5;

/// Errors that can occur while writing a cache record.
///
/// Reads have no error type; every read failure is reported as a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache persist error: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Last successful provider result for one pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub kind: MarketKind,
    pub base: String,
    pub quote: String,
    /// Stored as a string so the price survives the round trip exactly
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: UnitPrice,
    pub provider: ProviderId,
    pub fetched_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Time elapsed since the record was fetched.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// A record is fresh while its age is strictly below the kind's TTL.
    ///
    /// Records stamped up to five minutes in the future (clock skew) count as
    /// fresh. Anything further ahead is stale, so a bad timestamp cannot pin
    /// the record forever.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = self.age(now);
        age >= -Duration::minutes(MAX_FUTURE_SKEW_MINUTES) && age < self.kind.ttl()
    }

    fn has_plausible_price(&self) -> bool {
        self.unit_price > UnitPrice::ZERO && self.unit_price <= UnitPrice::from(MAX_UNIT_PRICE)
    }

    fn matches(&self, kind: MarketKind, base: &str, quote: &str) -> bool {
        self.kind == kind && self.base == base && self.quote == quote
    }
}

impl From<&QuoteResult> for CacheRecord {
    fn from(result: &QuoteResult) -> Self {
        Self {
            kind: result.kind,
            base: result.base.clone(),
            quote: result.quote.clone(),
            unit_price: result.unit_price,
            provider: result.provider.clone(),
            fetched_at: result.fetched_at,
        }
    }
}

/// File-backed cache store.
///
/// Writers build the complete record in a temporary file next to the target
/// and rename it into place, so concurrent readers see either the previous
/// record or the new one. Concurrent writers to one key: last writer wins.
#[derive(Clone, Debug)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for a key.
    pub fn path_for(&self, kind: MarketKind, base: &str, quote: &str) -> PathBuf {
        self.dir.join(format!("{}_{}_{}.json", kind, base, quote))
    }

    /// Read the record for a key.
    ///
    /// Returns `None` when the file is missing, unreadable or malformed, holds
    /// a record for a different key, or holds a price outside `(0, MAX_UNIT_PRICE]`.
    pub fn read(&self, kind: MarketKind, base: &str, quote: &str) -> Option<CacheRecord> {
        let path = self.path_for(kind, base, quote);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache record at {}", path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read cache record {}: {}", path.display(), e);
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!("Ignoring corrupt cache record {}: {}", path.display(), e);
                return None;
            }
        };

        if !record.matches(kind, base, quote) {
            warn!(
                "Ignoring cache record {} keyed {}/{}/{}",
                path.display(),
                record.kind,
                record.base,
                record.quote
            );
            return None;
        }

        if !record.has_plausible_price() {
            warn!(
                "Ignoring cache record {} with implausible price {}",
                path.display(),
                record.unit_price
            );
            return None;
        }

        Some(record)
    }

    /// Replace the record for the record's key.
    pub fn write(&self, record: &CacheRecord) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(record.kind, &record.base, &record.quote);
        let payload = serde_json::to_vec_pretty(record)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;

        debug!("Wrote cache record {}", path.display());
        Ok(())
    }
}
