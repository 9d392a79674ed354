//! On-disk cache of the last successful quote per pair.
//!
//! One JSON file per `(kind, base, quote)` key lives in the cache directory.
//! Records are only replaced by successful live fetches and are never deleted
//! by this crate. Reads never fail: a missing, unreadable or corrupt file is a
//! cache miss.

mod store;

pub use store::{CacheError, CacheRecord, CacheStore};
