//! Output locations: cache file, map artifacts, session logs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Root for everything ssidmap writes.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl OutputConfig {
    #[must_use]
    pub fn maps_dir(&self) -> PathBuf {
        self.data_dir.join("maps")
    }

    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Durable cache file. Mock runs keep a separate file so fabricated
    /// coordinates never reach the real cache.
    #[must_use]
    pub fn cache_path(&self, mock: bool) -> PathBuf {
        if mock {
            self.data_dir.join("wigle_cache.mock.json")
        } else {
            self.data_dir.join("wigle_cache.json")
        }
    }

    /// CSV export of the last run's resolved points, kept apart for mock runs
    /// like the cache.
    #[must_use]
    pub fn results_csv_path(&self, mock: bool) -> PathBuf {
        if mock {
            self.data_dir.join("mapped_results.mock.csv")
        } else {
            self.data_dir.join("mapped_results.csv")
        }
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(".ssidmap.lock")
    }
}
