use crate::cache::{Clock, SuggestionCache, SystemClock};
use crate::models::{AddressSearchResult, AddressSuggestion, AutocompleteOptions};
use crate::normalize::normalize_query;
use crate::ranking::rank;
use crate::traits::SuggestionSource;
use crate::SuggestError;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub type SharedSource = Arc<dyn SuggestionSource + Send + Sync>;

/// Fan-out/merge pipeline over every registered suggestion source.
/// Registration order is aggregation priority: when two sources return
/// the same address, the earlier source's candidate is kept.
///
/// The public surface never returns an error. Every failure inside the
/// pipeline is logged and degrades to an empty or shorter list, so a
/// caller typing into a search box is never blocked on a broken
/// backend.
pub struct AddressAutocompleteService<C: Clock = SystemClock> {
    sources: Vec<SharedSource>,
    cache: SuggestionCache<C>,
    options: AutocompleteOptions,
}

impl AddressAutocompleteService<SystemClock> {
    pub fn new(sources: Vec<SharedSource>, options: AutocompleteOptions) -> Self {
        let cache = SuggestionCache::new(
            options.cache_ttl,
            options.cache_max_entries,
            options.cache_evict_batch,
        );
        Self::with_cache(sources, options, cache)
    }
}

impl<C: Clock> AddressAutocompleteService<C> {
    /// The cache is constructor-injected rather than process-global so
    /// tests can drive expiry with their own clock and instances stay
    /// isolated.
    pub fn with_cache(
        sources: Vec<SharedSource>,
        options: AutocompleteOptions,
        cache: SuggestionCache<C>,
    ) -> Self {
        Self {
            sources,
            cache,
            options,
        }
    }

    /// Ranked, deduplicated, truncated suggestions for one query.
    /// Sub-minimum queries come back empty without touching any
    /// source; a live cache entry short-circuits the fan-out entirely.
    pub async fn suggestions(&self, query: &str) -> Vec<AddressSuggestion> {
        if query.trim().chars().count() < self.options.min_query_chars {
            return Vec::new();
        }

        let normalized = normalize_query(query);
        if let Some(hit) = self.cache.get(&normalized) {
            debug!(query = %normalized, "cache hit");
            return hit.suggestions;
        }

        let batches = self.settle_all_sources(&normalized).await;
        let merged = combine(batches);
        let mut ranked = rank(merged, &normalized);

        let total = ranked.len();
        let has_more = total > self.options.max_suggestions;
        ranked.truncate(self.options.max_suggestions);

        self.cache.put(
            normalized,
            AddressSearchResult {
                suggestions: ranked.clone(),
                total,
                has_more,
                cached_at: DateTime::<Utc>::UNIX_EPOCH,
            },
        );

        ranked
    }

    /// The full cached unit for a query, including the pre-truncation
    /// total and the `has_more` flag. `None` when the query has not
    /// been fetched or its entry has expired.
    pub fn cached(&self, query: &str) -> Option<AddressSearchResult> {
        self.cache.get(&normalize_query(query))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Fires every source at once and waits for all of them to settle.
    /// A failed or timed-out source is logged and contributes an empty
    /// batch; it never aborts its siblings and there is no early
    /// return on first success.
    async fn settle_all_sources(&self, normalized: &str) -> Vec<Vec<AddressSuggestion>> {
        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let query = normalized.to_string();
            let limit = self.options.source_fetch_limit;
            let bound = self.options.source_timeout;
            async move {
                let outcome = match bound {
                    Some(bound) => match tokio::time::timeout(bound, source.fetch(&query, limit))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(SuggestError::Timeout(bound)),
                    },
                    None => source.fetch(&query, limit).await,
                };
                (source.name().to_string(), outcome)
            }
        });

        join_all(fetches)
            .await
            .into_iter()
            .map(|(name, outcome)| match outcome {
                Ok(batch) => batch,
                Err(error) => {
                    warn!(source = %name, error = %error, "suggestion source failed");
                    Vec::new()
                }
            })
            .collect()
    }
}

/// Merges per-source batches in priority order, dropping any candidate
/// whose full address (lowercased, trimmed) was already produced by an
/// earlier batch or an earlier position. First occurrence wins outright
/// regardless of the loser's type or confidence.
fn combine(batches: Vec<Vec<AddressSuggestion>>) -> Vec<AddressSuggestion> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for batch in batches {
        for suggestion in batch {
            let key = suggestion.full_address.trim().to_lowercase();
            if seen.insert(key) {
                merged.push(suggestion);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_clock::FakeClock;
    use crate::classify::suggestion_from_address;
    use crate::models::{AddressType, DEFAULT_COUNTRY};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeSource {
        name: &'static str,
        addresses: Vec<&'static str>,
        fail: bool,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(name: &'static str, addresses: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                addresses,
                fail: false,
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                addresses: Vec::new(),
                fail: true,
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(name: &'static str, addresses: Vec<&'static str>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                addresses,
                fail: false,
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SuggestionSource for FakeSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(
            &self,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<AddressSuggestion>, SuggestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(SuggestError::Request("backend down".to_string()));
            }
            Ok(self
                .addresses
                .iter()
                .take(limit)
                .enumerate()
                .map(|(index, address)| {
                    suggestion_from_address(self.name, index, address, 0.8, DEFAULT_COUNTRY)
                })
                .collect())
        }
    }

    fn service_with_clock(
        sources: Vec<SharedSource>,
        clock: FakeClock,
    ) -> AddressAutocompleteService<FakeClock> {
        let options = AutocompleteOptions::default();
        let cache = SuggestionCache::with_clock(
            options.cache_ttl,
            options.cache_max_entries,
            options.cache_evict_batch,
            clock,
        );
        AddressAutocompleteService::with_cache(sources, options, cache)
    }

    fn service(sources: Vec<SharedSource>) -> AddressAutocompleteService<FakeClock> {
        service_with_clock(sources, FakeClock::default())
    }

    #[tokio::test]
    async fn short_queries_never_reach_sources() {
        let source = FakeSource::new("listing", vec!["123 Main St"]);
        let svc = service(vec![source.clone()]);

        assert!(svc.suggestions("").await.is_empty());
        assert!(svc.suggestions("a").await.is_empty());
        assert!(svc.suggestions("  a  ").await.is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let source = FakeSource::new(
            "listing",
            vec!["123 Main St, Springfield, IL 62704", "123 Main Ave, Springfield, IL"],
        );
        let svc = service(vec![source.clone()]);

        let first = svc.suggestions("123 Main").await;
        let second = svc.suggestions("123 Main").await;

        assert_eq!(source.call_count(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_fresh_fan_out() {
        let source = FakeSource::new("listing", vec!["123 Main St"]);
        let clock = FakeClock::default();
        let svc = service_with_clock(vec![source.clone()], clock.clone());

        svc.suggestions("123 Main").await;
        clock.advance(301);
        svc.suggestions("123 Main").await;

        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_suppress_the_other() {
        let broken: Arc<FakeSource> = FakeSource::failing("places");
        let healthy = FakeSource::new("listing", vec!["123 Main St"]);
        let svc = service(vec![broken.clone(), healthy.clone()]);

        let result = svc.suggestions("123 Main").await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].full_address, "123 Main St");
        assert_eq!(broken.call_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_addresses_keep_the_earlier_source() {
        let primary = FakeSource::new("listing", vec!["123 Main St, Springfield, IL"]);
        let secondary = FakeSource::new("places2", vec!["123 MAIN ST, Springfield, IL  "]);
        let svc = service(vec![primary, secondary]);

        let result = svc.suggestions("123 Main").await;

        assert_eq!(result.len(), 1);
        assert!(result[0].id.starts_with("listing-"));
    }

    #[tokio::test]
    async fn output_is_truncated_but_total_is_preserved() {
        let addresses = vec![
            "1 Main St", "2 Main St", "3 Main St", "4 Main St", "5 Main St", "6 Main St",
            "7 Main St", "8 Main St", "9 Main St", "10 Main St",
        ];
        let overflow = vec!["11 Main St", "12 Main St"];
        let first = FakeSource::new("listing", addresses);
        let second = FakeSource::new("places2", overflow);
        let svc = service(vec![first, second]);

        let result = svc.suggestions("Main").await;
        assert_eq!(result.len(), 10);

        let cached = svc.cached("Main").expect("result was cached");
        assert_eq!(cached.total, 12);
        assert!(cached.has_more);
    }

    #[tokio::test]
    async fn results_never_repeat_a_full_address() {
        let first = FakeSource::new("listing", vec!["Main Street", "Elm Park", "main street"]);
        let second = FakeSource::new("places2", vec!["ELM PARK", "Oak Valley"]);
        let svc = service(vec![first, second]);

        let result = svc.suggestions("ma").await;
        let mut keys: Vec<String> = result
            .iter()
            .map(|s| s.full_address.trim().to_lowercase())
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
        assert_eq!(before, 3);
    }

    #[tokio::test]
    async fn leading_digit_example_classifies_both_as_address() {
        let source = FakeSource::new(
            "listing",
            vec!["123 Main St, Springfield, IL 62704", "123 Main Ave, Springfield, IL"],
        );
        let svc = service(vec![source]);

        let result = svc.suggestions("123 Main").await;

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|s| s.kind == AddressType::Address));
        // Equal rank on all three levels keeps fetch order.
        assert_eq!(result[0].full_address, "123 Main St, Springfield, IL 62704");
    }

    #[tokio::test]
    async fn timed_out_source_counts_as_failed() {
        let slow = FakeSource::slow("places2", vec!["999 Slow Rd"], Duration::from_millis(200));
        let fast = FakeSource::new("listing", vec!["123 Main St"]);
        let options = AutocompleteOptions {
            source_timeout: Some(Duration::from_millis(20)),
            ..AutocompleteOptions::default()
        };
        let cache = SuggestionCache::with_clock(
            options.cache_ttl,
            options.cache_max_entries,
            options.cache_evict_batch,
            FakeClock::default(),
        );
        let svc = AddressAutocompleteService::with_cache(vec![slow, fast], options, cache);

        let result = svc.suggestions("123 Main").await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].full_address, "123 Main St");
    }

    #[tokio::test]
    async fn clear_cache_forces_a_refetch() {
        let source = FakeSource::new("listing", vec!["123 Main St"]);
        let svc = service(vec![source.clone()]);

        svc.suggestions("123 Main").await;
        svc.clear_cache();
        svc.suggestions("123 Main").await;

        assert_eq!(source.call_count(), 2);
    }
}
