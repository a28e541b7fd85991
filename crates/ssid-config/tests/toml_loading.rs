//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use ssid_config::SsidConfig;
use std::path::PathBuf;

#[test]
fn loads_wigle_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[wigle]
api_name = "AID0001"
api_token = "token-from-toml"
timeout_secs = 5
"#,
        )?;

        let config: SsidConfig = Figment::from(Serialized::defaults(SsidConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.wigle.api_name, "AID0001");
        assert_eq!(config.wigle.api_token, "token-from-toml");
        assert_eq!(config.wigle.timeout_secs, 5);
        assert!(config.wigle.is_configured());
        // untouched fields keep their defaults
        assert_eq!(
            config.wigle.endpoint,
            "https://api.wigle.net/api/v2/network/search"
        );
        Ok(())
    });
}

#[test]
fn loads_resolver_and_output_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[resolver]
requery_failures = true
max_retries = 2
request_delay_ms = 0
allow_null_island = true

[output]
data_dir = "/tmp/ssidmap-data"
"#,
        )?;

        let config: SsidConfig = Figment::from(Serialized::defaults(SsidConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.resolver.requery_failures);
        assert_eq!(config.resolver.max_retries, 2);
        assert_eq!(config.resolver.request_delay_ms, 0);
        assert!(config.resolver.allow_null_island);
        assert_eq!(config.output.data_dir, PathBuf::from("/tmp/ssidmap-data"));
        Ok(())
    });
}

#[test]
fn validator_placeholders_can_be_replaced() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validator]
min_length = 3

[[validator.placeholders]]
reason = "vendor_default"
pattern = "(?i)^guest"
"#,
        )?;

        let config: SsidConfig = Figment::from(Serialized::defaults(SsidConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.validator.min_length, 3);
        assert_eq!(config.validator.placeholders.len(), 1);

        let validator = config.validator.build().expect("valid patterns");
        assert!(!validator.validate("Guest-5G").accepted);
        assert!(validator.validate("netgear42").accepted);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[wigle]
api_name = "from-toml"
"#,
        )?;
        jail.set_env("SSIDMAP_WIGLE__API_NAME", "from-env");

        let config: SsidConfig = Figment::from(Serialized::defaults(SsidConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("SSIDMAP_").split("__"))
            .extract()?;

        assert_eq!(config.wigle.api_name, "from-env");
        Ok(())
    });
}

#[test]
fn project_local_config_is_discovered() {
    Jail::expect_with(|jail| {
        jail.create_dir(".ssidmap")?;
        jail.create_file(
            ".ssidmap/config.toml",
            r#"
[resolver]
max_retries = 1
"#,
        )?;

        let config = SsidConfig::load().expect("config loads");
        assert_eq!(config.resolver.max_retries, 1);
        Ok(())
    });
}

#[test]
fn explicit_file_beats_project_local() {
    Jail::expect_with(|jail| {
        jail.create_dir(".ssidmap")?;
        jail.create_file(".ssidmap/config.toml", "[resolver]\nmax_retries = 1\n")?;
        jail.create_file("custom.toml", "[resolver]\nmax_retries = 2\n")?;

        let config =
            SsidConfig::load_from(Some(std::path::Path::new("custom.toml"))).expect("loads");
        assert_eq!(config.resolver.max_retries, 2);
        Ok(())
    });
}

#[test]
fn missing_explicit_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let result = SsidConfig::load_from(Some(std::path::Path::new("nope.toml")));
        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn zero_timeout_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("SSIDMAP_WIGLE__TIMEOUT_SECS", "0");
        let result = SsidConfig::load();
        assert!(result.is_err());
        Ok(())
    });
}
