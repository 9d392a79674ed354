//! Provider attempt tracking for fetch diagnostics.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::errors::ProviderError;
use crate::models::ProviderId;

/// Final outcome of the calls made to one provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// The error returned by the last call.
    Failure(ProviderError),
}

/// Record of one provider consulted during a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    /// Number of calls made, retries included.
    pub attempts: u32,
    pub outcome: AttemptOutcome,
}

impl ProviderAttempt {
    pub fn error(&self) -> Option<&ProviderError> {
        match &self.outcome {
            AttemptOutcome::Success => None,
            AttemptOutcome::Failure(e) => Some(e),
        }
    }
}

impl Serialize for ProviderAttempt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProviderAttempt", 5)?;
        state.serialize_field("provider", &self.provider)?;
        state.serialize_field("attempts", &self.attempts)?;
        match &self.outcome {
            AttemptOutcome::Success => {
                state.serialize_field("outcome", "success")?;
                state.skip_field("error_kind")?;
                state.skip_field("message")?;
            }
            AttemptOutcome::Failure(e) => {
                state.serialize_field("outcome", "failure")?;
                state.serialize_field("error_kind", e.kind())?;
                state.serialize_field("message", &e.to_string())?;
            }
        }
        state.end()
    }
}

/// Ordered log of the providers consulted during one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttemptTrace {
    attempts: Vec<ProviderAttempt>,
}

impl AttemptTrace {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record_success(&mut self, provider: ProviderId, attempts: u32) {
        self.attempts.push(ProviderAttempt {
            provider,
            attempts,
            outcome: AttemptOutcome::Success,
        });
    }

    pub fn record_failure(&mut self, provider: ProviderId, attempts: u32, error: ProviderError) {
        self.attempts.push(ProviderAttempt {
            provider,
            attempts,
            outcome: AttemptOutcome::Failure(error),
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no providers tried".to_string();
        }

        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Success => format!("{}: SUCCESS", a.provider),
                AttemptOutcome::Failure(e) => {
                    format!("{}: ERROR({} x{})", a.provider, e.kind(), a.attempts)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn attempts(&self) -> &[ProviderAttempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl Serialize for AttemptTrace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attempts.serialize(serializer)
    }
}
