use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Quote category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Fiat exchange rate (e.g. USD/TWD)
    Fiat,
    /// Crypto spot price (e.g. BTC/USD)
    Crypto,
}

impl MarketKind {
    /// Maximum age at which a cached record is served without a live fetch.
    ///
    /// Fixed per kind; records do not carry their own TTL.
    pub fn ttl(self) -> Duration {
        match self {
            Self::Fiat => Duration::hours(24),
            Self::Crypto => Duration::minutes(5),
        }
    }

    /// Lowercase label used in cache keys and rendered output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiat => "fiat",
            Self::Crypto => "crypto",
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
