use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::ui;

/// Per-record progress for `ssidmap run`, drawn on stderr. Inert when
/// progress is disabled.
pub struct RunProgress {
    bar: Option<ProgressBar>,
}

fn template(term_width: Option<usize>) -> &'static str {
    match term_width {
        Some(cols) if cols >= 100 => "{spinner} [{bar:32}] {pos}/{len} {prefix} {wide_msg}",
        Some(cols) if cols >= 60 => "[{bar:20}] {pos}/{len} {prefix}",
        _ => "{pos}/{len} {prefix}",
    }
}

impl RunProgress {
    #[must_use]
    pub fn start(records: usize) -> Self {
        let prefs = ui::prefs();
        if !prefs.progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::with_draw_target(
            Some(u64::try_from(records).unwrap_or(u64::MAX)),
            ProgressDrawTarget::stderr(),
        );
        if let Ok(style) = ProgressStyle::with_template(template(prefs.term_width)) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix("0 located");
        Self { bar: Some(bar) }
    }

    /// Count one processed record. `located` is the running number of
    /// resolved SSIDs.
    pub fn record_done(&self, ssid: &str, located: usize) {
        if let Some(bar) = &self.bar {
            bar.set_prefix(format!("{located} located"));
            bar.set_message(ssid.to_string());
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn abort(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message("aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_progress_is_inert() {
        // ui::init is never called in unit tests, so progress is off.
        let progress = RunProgress::start(10);
        assert!(progress.bar.is_none());
        progress.record_done("HomeNet42", 1);
        progress.finish();
    }

    #[test]
    fn narrow_terminals_drop_the_bar() {
        assert!(template(Some(120)).contains("{bar:32}"));
        assert!(template(Some(70)).contains("{bar:20}"));
        assert!(!template(None).contains("bar"));
    }
}
