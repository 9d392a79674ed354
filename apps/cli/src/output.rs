//! JSON documents written to stdout and the matching process exit codes.
//!
//! | Outcome | `error.kind` | Exit code |
//! |---------|--------------|-----------|
//! | Success | - | 0 |
//! | Internal failure | `internal` | 1 |
//! | Bad input or usage | `validation` | 2 |
//! | Every provider failed, no cache | `no_usable_result` | 3 |

use std::process::ExitCode;

use serde_json::{json, Value};
use thiserror::Error;

use alfred_market_data::{MarketDataError, QuoteResult, ValidationError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Market(#[from] MarketDataError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage(_) | Self::Validation(_) => "validation",
            Self::Market(MarketDataError::NoUsableResult { .. }) => "no_usable_result",
            Self::Internal(_) => "internal",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Validation(_) => 2,
            Self::Market(MarketDataError::NoUsableResult { .. }) => 3,
            Self::Internal(_) => 1,
        }
    }

    pub fn to_json(&self) -> Value {
        let trace = match self {
            Self::Market(MarketDataError::NoUsableResult { trace, .. }) => {
                serde_json::to_value(trace).unwrap_or(Value::Null)
            }
            _ => Value::Array(Vec::new()),
        };

        let message = match self {
            Self::Internal(e) => format!("{:#}", e),
            _ => self.to_string(),
        };

        json!({
            "error": {
                "kind": self.kind(),
                "message": message,
                "trace": trace,
            }
        })
    }
}

pub fn emit_success(result: &QuoteResult) -> ExitCode {
    match serde_json::to_string(result) {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => emit_failure(&CliError::Internal(e.into())),
    }
}

pub fn emit_failure(error: &CliError) -> ExitCode {
    tracing::debug!("Request failed: {}", error);
    println!("{}", error.to_json());
    ExitCode::from(error.exit_code())
}
