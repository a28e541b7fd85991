//! Cache-or-fetch orchestration.

use std::time::Duration;

use chrono::Utc;
use ssid_cache::ResolutionCache;
use ssid_config::ResolverConfig;
use ssid_core::entities::CacheEntry;
use ssid_core::enums::{CacheStatus, FailureKind};
use ssid_core::normalize_ssid;
use ssid_wigle::{LocationSource, LookupError, LookupOutcome};
use tokio::time::Instant;

use crate::{CoordinatePolicy, ResolutionResult, ResolveError};

/// Deadline applied to every lookup unless overridden.
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves SSIDs through a cache in front of a [`LocationSource`].
///
/// The resolver owns the cache for the duration of a run; it is the only
/// writer. Calls are sequential (`&mut self`), which serializes access to
/// each key.
pub struct Resolver<S> {
    source: S,
    cache: ResolutionCache,
    policy: CoordinatePolicy,
    requery_failures: bool,
    max_retries: u32,
    retry_backoff: Duration,
    request_delay: Duration,
    lookup_timeout: Duration,
    last_query: Option<Instant>,
    external_queries: u64,
}

impl<S: LocationSource> Resolver<S> {
    #[must_use]
    pub fn new(source: S, cache: ResolutionCache, config: &ResolverConfig) -> Self {
        Self {
            source,
            cache,
            policy: CoordinatePolicy::from_config(config),
            requery_failures: config.requery_failures,
            max_retries: config.effective_retries(),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            request_delay: Duration::from_millis(config.request_delay_ms),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            last_query: None,
            external_queries: 0,
        }
    }

    /// Override the per-lookup deadline. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub const fn with_requery_failures(mut self, requery: bool) -> Self {
        self.requery_failures = requery;
        self
    }

    /// External queries issued so far, retries included.
    #[must_use]
    pub const fn external_queries(&self) -> u64 {
        self.external_queries
    }

    #[must_use]
    pub const fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Hand the cache back, e.g. to flush it explicitly.
    #[must_use]
    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    /// Resolve one SSID.
    ///
    /// A cached `resolved` entry is always returned without a query. Cached
    /// `not_found`/`error` entries are returned as well unless
    /// `requery_failures` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Cache`] when an outcome cannot be persisted and
    /// [`ResolveError::EmptySsid`] for SSIDs that normalize to nothing. Lookup
    /// failures are reported through [`ResolutionResult::Error`], not here.
    pub async fn resolve(&mut self, ssid: &str) -> Result<ResolutionResult, ResolveError> {
        let key = normalize_ssid(ssid);
        if key.is_empty() {
            return Err(ResolveError::EmptySsid(ssid.to_string()));
        }

        if let Some(cached) = self.cached_result(&key) {
            return Ok(cached);
        }

        let now = Utc::now();
        let source = self.source.source_name().to_string();
        match self.query_with_retry(ssid).await {
            Ok(LookupOutcome::Found {
                coordinate,
                address,
            }) => match self.policy.check(coordinate) {
                Ok(()) => {
                    self.cache.put(CacheEntry::resolved(
                        &key,
                        coordinate,
                        address.clone(),
                        source,
                        now,
                    ))?;
                    tracing::debug!(%ssid, %coordinate, "resolved");
                    Ok(ResolutionResult::Resolved {
                        coordinate,
                        address,
                        from_cache: false,
                    })
                }
                Err(reason) => {
                    tracing::info!(%ssid, %coordinate, %reason, "coordinate rejected");
                    self.cache
                        .put(CacheEntry::not_found(&key, reason.as_str(), source, now))?;
                    Ok(ResolutionResult::NotFound {
                        reason: reason.as_str().to_string(),
                        from_cache: false,
                    })
                }
            },
            Ok(LookupOutcome::NoData(reason)) => {
                tracing::debug!(%ssid, %reason, "no location data");
                self.cache
                    .put(CacheEntry::not_found(&key, reason.as_str(), source, now))?;
                Ok(ResolutionResult::NotFound {
                    reason: reason.as_str().to_string(),
                    from_cache: false,
                })
            }
            Err(error) => {
                let kind = error.kind();
                if kind.is_terminal() {
                    tracing::warn!(%ssid, %kind, %error, "lookup failed; caching as error");
                    self.cache
                        .put(CacheEntry::error(&key, kind.as_str(), source, now))?;
                } else {
                    tracing::warn!(%ssid, %kind, %error, "lookup failed; will retry on a later run");
                }
                Ok(ResolutionResult::Error {
                    kind,
                    message: error.to_string(),
                    from_cache: false,
                })
            }
        }
    }

    fn cached_result(&self, key: &str) -> Option<ResolutionResult> {
        let entry = self.cache.get(key)?;
        match entry.status {
            CacheStatus::Resolved => {
                let coordinate = entry.coordinate?;
                tracing::debug!(%key, "cache hit");
                Some(ResolutionResult::Resolved {
                    coordinate,
                    address: entry.address.clone(),
                    from_cache: true,
                })
            }
            _ if self.requery_failures => {
                tracing::debug!(%key, status = %entry.status, "re-querying cached failure");
                None
            }
            CacheStatus::NotFound => Some(ResolutionResult::NotFound {
                reason: entry
                    .reason
                    .clone()
                    .unwrap_or_else(|| CacheStatus::NotFound.as_str().to_string()),
                from_cache: true,
            }),
            CacheStatus::Error => {
                let kind = match entry.reason.as_deref() {
                    Some("malformed") => FailureKind::Malformed,
                    _ => FailureKind::Rejected,
                };
                Some(ResolutionResult::Error {
                    kind,
                    message: format!("cached {kind} failure"),
                    from_cache: true,
                })
            }
        }
    }

    /// Query the source, retrying transient failures with doubling backoff.
    async fn query_with_retry(&mut self, ssid: &str) -> Result<LookupOutcome, LookupError> {
        let mut backoff = self.retry_backoff;
        let mut attempt = 0;
        loop {
            let result = self.query_once(ssid).await;
            match result {
                Err(error) if error.kind() == FailureKind::Transient && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        %ssid,
                        %error,
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        "transient lookup failure; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                other => return other,
            }
        }
    }

    /// One paced, deadline-bounded lookup.
    async fn query_once(&mut self, ssid: &str) -> Result<LookupOutcome, LookupError> {
        if let Some(last) = self.last_query {
            tokio::time::sleep_until(last + self.request_delay).await;
        }
        self.last_query = Some(Instant::now());
        self.external_queries += 1;

        match tokio::time::timeout(self.lookup_timeout, self.source.lookup(ssid)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout {
                secs: self.lookup_timeout.as_secs().max(1),
            }),
        }
    }
}
