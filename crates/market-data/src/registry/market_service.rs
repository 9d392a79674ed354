//! Market service orchestrating cache, providers and retries.
//!
//! Every request follows the same sequence:
//! 1. Read the cache record; serve it as `cache_fresh` if younger than the TTL
//! 2. Try the providers for the market kind in fixed order, each behind the
//!    retry policy
//! 3. On the first success, write the record through and serve it as `live`
//! 4. When every provider fails, serve any cached record as
//!    `cache_stale_fallback`, or fail with the full attempt trace

use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, info, warn};

use super::{AttemptTrace, RetryConfig, RetryPolicy};
use crate::cache::{CacheRecord, CacheStore};
use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::config::MarketConfig;
use crate::errors::MarketDataError;
use crate::models::{Freshness, QuoteRequest, QuoteResult};
use crate::provider::{build_client, Provider, ProviderSet, QuoteProvider};

/// Quote service for fiat and crypto pairs.
pub struct MarketService<P = Provider> {
    providers: ProviderSet<P>,
    store: CacheStore,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl MarketService<Provider> {
    /// Build a service against the public providers using `config`.
    pub fn from_config(config: &MarketConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config.http_timeout)?;
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);

        Ok(Self::new(
            ProviderSet::public(client),
            CacheStore::new(&config.cache_dir),
            RetryPolicy::new(RetryConfig::default(), sleeper),
            Arc::new(SystemClock),
        ))
    }
}

impl<P: QuoteProvider> MarketService<P> {
    pub fn new(
        providers: ProviderSet<P>,
        store: CacheStore,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            store,
            retry,
            clock,
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn providers(&self) -> &ProviderSet<P> {
        &self.providers
    }

    /// Resolve a quote for a validated request.
    ///
    /// Provider failures never surface individually. The only error is
    /// [`MarketDataError::NoUsableResult`], returned when every provider
    /// failed and no cache record exists for the pair.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult, MarketDataError> {
        let kind = request.kind();
        let base = request.base();
        let quote = request.quote();

        let cached = self.store.read(kind, base, quote);

        if let Some(record) = &cached {
            if record.is_fresh(self.clock.now()) {
                debug!(
                    "Serving fresh cache for {} {}/{} from '{}'",
                    kind, base, quote, record.provider
                );
                return Ok(Self::from_record(request, record, Freshness::CacheFresh));
            }
            debug!(
                "Cache for {} {}/{} is stale (fetched {})",
                kind, base, quote, record.fetched_at
            );
        }

        let mut trace = AttemptTrace::new();

        for provider in self.providers.for_kind(kind) {
            let provider_id = provider.id();
            let outcome = self
                .retry
                .run(provider_id, || provider.fetch(base, quote))
                .await;

            match outcome.result {
                Ok(unit_price) => {
                    trace.record_success(Cow::Borrowed(provider_id), outcome.attempts);

                    let result = QuoteResult::new(
                        request,
                        unit_price,
                        Cow::Borrowed(provider_id),
                        self.clock.now(),
                        Freshness::Live,
                    );

                    if let Err(e) = self.store.write(&CacheRecord::from(&result)) {
                        warn!("Failed to cache {} {}/{}: {}", kind, base, quote, e);
                    }

                    info!(
                        "Fetched {} {}/{} = {}. Attempts: {}",
                        kind,
                        base,
                        quote,
                        unit_price,
                        trace.summary()
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!(
                        "Provider '{}' failed for {} {}/{} after {} attempt(s): {}",
                        provider_id, kind, base, quote, outcome.attempts, e
                    );
                    trace.record_failure(Cow::Borrowed(provider_id), outcome.attempts, e);
                }
            }
        }

        match cached {
            Some(record) => {
                warn!(
                    "All providers failed for {} {}/{}, serving stale cache from {}. Attempts: {}",
                    kind,
                    base,
                    quote,
                    record.fetched_at,
                    trace.summary()
                );
                Ok(Self::from_record(
                    request,
                    &record,
                    Freshness::CacheStaleFallback,
                ))
            }
            None => Err(MarketDataError::NoUsableResult {
                kind,
                base: base.to_string(),
                quote: quote.to_string(),
                trace,
            }),
        }
    }

    fn from_record(
        request: &QuoteRequest,
        record: &CacheRecord,
        freshness: Freshness,
    ) -> QuoteResult {
        QuoteResult::new(
            request,
            record.unit_price,
            record.provider.clone(),
            record.fetched_at,
            freshness,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::models::{MarketKind, UnitPrice};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;

    struct MockProvider {
        id: &'static str,
        result: Result<UnitPrice, ProviderError>,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn ok(id: &'static str, price: UnitPrice) -> Self {
            Self {
                id,
                result: Ok(price),
                call_count: AtomicUsize::new(0),
            }
        }

        fn failing(id: &'static str, error: ProviderError) -> Self {
            Self {
                id,
                result: Err(error),
                call_count: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn fetch(&self, _base: &str, _quote: &str) -> Result<UnitPrice, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn service(
        providers: ProviderSet<MockProvider>,
        store: CacheStore,
    ) -> MarketService<MockProvider> {
        MarketService::new(
            providers,
            store,
            RetryPolicy::new(RetryConfig::default(), Arc::new(NoSleep)),
            Arc::new(crate::clock::FixedClock(now())),
        )
    }

    #[tokio::test]
    async fn test_live_fiat_fetch_writes_through() {
        let dir = tempdir().unwrap();
        let svc = service(
            ProviderSet {
                fiat: MockProvider::ok("FIAT", dec!(31.5)),
                crypto_primary: MockProvider::ok("PRIMARY", dec!(1)),
                crypto_fallback: MockProvider::ok("FALLBACK", dec!(1)),
            },
            CacheStore::new(dir.path()),
        );
        let request = QuoteRequest::new(MarketKind::Fiat, "USD", "TWD", dec!(10)).unwrap();

        let result = svc.quote(&request).await.unwrap();

        assert_eq!(result.freshness, Freshness::Live);
        assert_eq!(result.converted, dec!(315));
        assert_eq!(result.provider, "FIAT");
        assert_eq!(result.fetched_at, now());
        assert_eq!(svc.providers.crypto_primary.calls(), 0);

        let record = svc.store().read(MarketKind::Fiat, "USD", "TWD").unwrap();
        assert_eq!(record.unit_price, dec!(31.5));
        assert_eq!(record.provider, "FIAT");
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let dir = tempdir().unwrap();
        let svc = service(
            ProviderSet {
                fiat: MockProvider::ok("FIAT", dec!(1)),
                crypto_primary: MockProvider::ok("PRIMARY", dec!(61000)),
                crypto_fallback: MockProvider::ok("FALLBACK", dec!(60000)),
            },
            CacheStore::new(dir.path()),
        );
        let request = QuoteRequest::new(MarketKind::Crypto, "BTC", "USD", dec!(1)).unwrap();

        let result = svc.quote(&request).await.unwrap();

        assert_eq!(result.provider, "PRIMARY");
        assert_eq!(svc.providers.crypto_primary.calls(), 1);
        assert_eq!(svc.providers.crypto_fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_fiat_failure_without_cache_has_single_trace_entry() {
        let dir = tempdir().unwrap();
        let svc = service(
            ProviderSet {
                fiat: MockProvider::failing("FIAT", ProviderError::Http { status: 503 }),
                crypto_primary: MockProvider::ok("PRIMARY", dec!(1)),
                crypto_fallback: MockProvider::ok("FALLBACK", dec!(1)),
            },
            CacheStore::new(dir.path()),
        );
        let request = QuoteRequest::new(MarketKind::Fiat, "USD", "TWD", dec!(1)).unwrap();

        let err = svc.quote(&request).await.unwrap_err();

        let MarketDataError::NoUsableResult { trace, .. } = err;
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.attempts()[0].provider, "FIAT");
        assert_eq!(trace.attempts()[0].attempts, 3);
        assert_eq!(svc.providers.fiat.calls(), 3);
    }
}
