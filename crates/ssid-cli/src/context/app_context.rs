use std::time::Duration;

use anyhow::Context;
use ssid_cache::{Durability, ResolutionCache};
use ssid_config::{ResolverConfig, SsidConfig};
use ssid_core::SsidValidator;
use ssid_resolver::Resolver;
use ssid_wigle::{AnySource, LocationSource, LookupError, MockSource, WigleClient};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: SsidConfig,
    pub validator: SsidValidator,
}

impl AppContext {
    /// Compile the validator policy. The cache and lookup source are opened
    /// per command since most commands touch only one of them.
    pub fn new(config: SsidConfig) -> anyhow::Result<Self> {
        let validator = config
            .validator
            .build()
            .context("invalid [validator] configuration")?;
        Ok(Self { config, validator })
    }

    /// Mock mode from the flag or the `wigle.mock` setting.
    #[must_use]
    pub const fn mock_mode(&self, flag: bool) -> bool {
        flag || self.config.wigle.mock
    }

    /// Open the cache file for live or mock runs.
    pub fn open_cache(&self, mock: bool) -> anyhow::Result<ResolutionCache> {
        let path = self.config.output.cache_path(mock);
        ResolutionCache::open(&path, Durability::WriteThrough)
            .with_context(|| format!("failed to open resolution cache {}", path.display()))
    }

    /// Pick the lookup backend. Live lookups require credentials.
    pub fn source(&self, mock: bool) -> anyhow::Result<AnySource> {
        if mock {
            tracing::info!("mock mode: coordinates are synthetic");
            return Ok(AnySource::Mock(MockSource::new()));
        }
        match WigleClient::from_config(&self.config.wigle) {
            Ok(client) => Ok(AnySource::Wigle(client)),
            Err(LookupError::MissingCredentials) => Err(anyhow::anyhow!(
                "WiGLE credentials are not configured; set WIGLE_API_NAME and WIGLE_API_TOKEN (or [wigle] in config.toml), or pass --mock"
            )),
            Err(error) => Err(error).context("failed to build WiGLE client"),
        }
    }

    /// Resolver settings for this run. Mock lookups skip the politeness delay.
    #[must_use]
    pub fn resolver_config(&self, mock: bool, requery_failures: bool) -> ResolverConfig {
        let mut config = self.config.resolver.clone();
        config.requery_failures |= requery_failures;
        if mock {
            config.request_delay_ms = 0;
        }
        config
    }

    /// Assemble a resolver over `source` and its cache.
    pub fn resolver<S: LocationSource>(
        &self,
        source: S,
        cache: ResolutionCache,
        config: &ResolverConfig,
    ) -> Resolver<S> {
        Resolver::new(source, cache, config)
            .with_lookup_timeout(Duration::from_secs(self.config.wigle.timeout_secs.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use ssid_config::{SsidConfig, WigleConfig};

    use super::AppContext;

    #[test]
    fn live_source_without_credentials_is_an_error() {
        let ctx = AppContext::new(SsidConfig::default()).unwrap();
        let error = ctx.source(false).err().expect("should fail");
        assert!(error.to_string().contains("--mock"));
    }

    #[test]
    fn mock_source_needs_no_credentials() {
        let ctx = AppContext::new(SsidConfig::default()).unwrap();
        assert!(ctx.source(true).is_ok());
    }

    #[test]
    fn mock_mode_follows_config_or_flag() {
        let mut config = SsidConfig::default();
        let ctx = AppContext::new(config.clone()).unwrap();
        assert!(!ctx.mock_mode(false));
        assert!(ctx.mock_mode(true));

        config.wigle = WigleConfig {
            mock: true,
            ..WigleConfig::default()
        };
        let ctx = AppContext::new(config).unwrap();
        assert!(ctx.mock_mode(false));
    }

    #[test]
    fn mock_runs_drop_the_request_delay() {
        let ctx = AppContext::new(SsidConfig::default()).unwrap();
        assert_eq!(ctx.resolver_config(true, false).request_delay_ms, 0);
        assert_eq!(ctx.resolver_config(false, false).request_delay_ms, 2500);
        assert!(ctx.resolver_config(false, true).requery_failures);
    }

    #[test]
    fn bad_placeholder_pattern_fails_startup() {
        let mut config = SsidConfig::default();
        config.validator.placeholders.push(ssid_config::PlaceholderEntry {
            reason: "broken".into(),
            pattern: "(".into(),
        });
        assert!(AppContext::new(config).is_err());
    }
}
