use figment::Jail;
use ssid_config::SsidConfig;

#[test]
fn legacy_credential_variables_fill_wigle_section() {
    Jail::expect_with(|jail| {
        jail.set_env("WIGLE_API_NAME", "AIDlegacy");
        jail.set_env("WIGLE_API_TOKEN", "legacy-token");

        let config = SsidConfig::load().expect("config loads");
        assert_eq!(config.wigle.api_name, "AIDlegacy");
        assert_eq!(config.wigle.api_token, "legacy-token");
        assert!(config.wigle.is_configured());
        Ok(())
    });
}

#[test]
fn prefixed_variables_beat_legacy_variables() {
    Jail::expect_with(|jail| {
        jail.set_env("WIGLE_API_NAME", "AIDlegacy");
        jail.set_env("SSIDMAP_WIGLE__API_NAME", "AIDprefixed");

        let config = SsidConfig::load().expect("config loads");
        assert_eq!(config.wigle.api_name, "AIDprefixed");
        Ok(())
    });
}

#[test]
fn unrelated_wigle_variables_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("WIGLE_ENDPOINT", "http://example.invalid");

        let config = SsidConfig::load().expect("config loads");
        assert_eq!(
            config.wigle.endpoint,
            "https://api.wigle.net/api/v2/network/search"
        );
        Ok(())
    });
}

#[test]
fn mock_flag_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("SSIDMAP_WIGLE__MOCK", "true");
        jail.set_env("SSIDMAP_RESOLVER__REQUERY_FAILURES", "true");

        let config = SsidConfig::load().expect("config loads");
        assert!(config.wigle.mock);
        assert!(config.resolver.requery_failures);
        Ok(())
    });
}
