use ssid_config::SsidConfig;

/// Env vars read directly rather than through the `SSIDMAP_` section mapping.
const PASSTHROUGH_KEYS: &[&str] = &["SSIDMAP_LOG"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &SsidConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SsidConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.wigle.is_configured() && has_env_prefix(&env_keys, "SSIDMAP_WIGLE") {
        warnings.push(
            "WiGLE credentials appear unset while SSIDMAP_WIGLE* env vars exist. Use double underscores (example: SSIDMAP_WIGLE__API_NAME)."
                .to_string(),
        );
    }

    let single_underscore = env_keys
        .iter()
        .filter(|key| key.starts_with("SSIDMAP_") && !key.contains("__"))
        .filter(|key| !PASSTHROUGH_KEYS.contains(&key.as_str()))
        .filter(|key| !key.starts_with("SSIDMAP_WIGLE"))
        .cloned()
        .collect::<Vec<_>>();
    if !single_underscore.is_empty() {
        warnings.push(format!(
            "ignoring {} (sections are separated by double underscores, example: SSIDMAP_RESOLVER__MAX_RETRIES)",
            single_underscore.join(", ")
        ));
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
