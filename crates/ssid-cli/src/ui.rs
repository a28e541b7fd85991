use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

/// Terminal presentation choices, fixed once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

fn resolve(
    flags: &GlobalFlags,
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<&str>,
) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => stdout_tty && table && !flags.quiet && !no_color,
    };

    // Bars draw on stderr, so they never mix with machine-readable stdout.
    let progress = match flags.progress {
        ProgressMode::On => stderr_tty && !flags.quiet,
        ProgressMode::Off => false,
        ProgressMode::Auto => stderr_tty && !flags.quiet && flags.format != OutputFormat::Json,
    };

    let term_width = columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, color: ColorMode, progress: ProgressMode) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet: false,
            verbose: false,
            data_dir: None,
            config: None,
            color,
            progress,
        }
    }

    #[test]
    fn color_only_for_tables() {
        let prefs = resolve(
            &flags(OutputFormat::Json, ColorMode::Always, ProgressMode::Auto),
            true,
            true,
            false,
            None,
        );
        assert!(!prefs.table_color);
    }

    #[test]
    fn no_color_env_disables_auto_color() {
        let prefs = resolve(
            &flags(OutputFormat::Table, ColorMode::Auto, ProgressMode::Auto),
            true,
            true,
            true,
            None,
        );
        assert!(!prefs.table_color);
    }

    #[test]
    fn progress_follows_mode_and_tty() {
        let on = flags(OutputFormat::Json, ColorMode::Never, ProgressMode::On);
        assert!(resolve(&on, false, true, false, None).progress);
        assert!(!resolve(&on, true, false, false, None).progress);

        let auto_json = flags(OutputFormat::Json, ColorMode::Never, ProgressMode::Auto);
        assert!(!resolve(&auto_json, true, true, false, None).progress);
    }

    #[test]
    fn narrow_columns_are_ignored() {
        let f = flags(OutputFormat::Table, ColorMode::Never, ProgressMode::Off);
        assert_eq!(resolve(&f, true, true, false, Some("20")).term_width, None);
        assert_eq!(resolve(&f, true, true, false, Some("120")).term_width, Some(120));
    }
}
