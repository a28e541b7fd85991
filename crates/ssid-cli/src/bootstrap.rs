use anyhow::Context;
use ssid_config::SsidConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, then apply command-line
/// overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SsidConfig> {
    load_dotenv()?;

    let mut config = SsidConfig::load_from(flags.config.as_deref()).with_context(|| {
        flags.config.as_deref().map_or_else(
            || String::from("failed to load configuration"),
            |path| format!("failed to load configuration from {}", path.display()),
        )
    })?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut SsidConfig, flags: &GlobalFlags) {
    if let Some(data_dir) = flags.data_dir.as_deref() {
        config.output.data_dir = data_dir.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ssid_config::SsidConfig;

    use super::apply_overrides;
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

    fn flags(data_dir: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            data_dir: data_dir.map(PathBuf::from),
            config: None,
            color: ColorMode::Never,
            progress: ProgressMode::Off,
        }
    }

    #[test]
    fn data_dir_flag_overrides_config() {
        let mut config = SsidConfig::default();
        apply_overrides(&mut config, &flags(Some("/tmp/ssidmap-run")));
        assert_eq!(config.output.data_dir, PathBuf::from("/tmp/ssidmap-run"));
        assert_eq!(
            config.output.maps_dir(),
            PathBuf::from("/tmp/ssidmap-run/maps")
        );
    }

    #[test]
    fn no_flag_keeps_configured_dir() {
        let mut config = SsidConfig::default();
        apply_overrides(&mut config, &flags(None));
        assert_eq!(config.output.data_dir, PathBuf::from("data"));
    }
}
