/// Classification for retry policy.
///
/// Used by the retry policy to decide whether a failed provider call is worth
/// repeating against the same provider.
///
/// # Behavior Summary
///
/// | Class | Retry same provider? | Move on to fallback? |
/// |-------|----------------------|----------------------|
/// | `WithBackoff` | Yes, until attempts are exhausted | Yes, after the last attempt |
/// | `Never` | No | Yes, immediately |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure: network trouble, HTTP 429 or a 5xx status.
    /// Retry after the next backoff delay.
    WithBackoff,

    /// Non-transient failure: the provider answered but the answer is unusable,
    /// or the pair cannot be expressed for this provider. Fail fast.
    Never,
}
