//! Per-point and summary map emission.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ssid_core::entities::{Coordinate, ResolvedPoint};

use crate::MapError;
use crate::naming::{SUMMARY_LABEL, sanitize_ssid, stem};
use crate::render::{Marker, POINT_ZOOM, SUMMARY_ZOOM, centre_of, render_page};

/// Writes map artifacts into one directory.
///
/// Names handed out by [`reserve_name`](Self::reserve_name) are unique for
/// the emitter's lifetime and never point at an existing file.
#[derive(Debug)]
pub struct MapEmitter {
    dir: PathBuf,
    reserved: HashSet<String>,
}

impl MapEmitter {
    /// Prepare `dir` for writing, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::OutputDir`] when the directory cannot be created or
    /// a file cannot be created inside it.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, MapError> {
        let dir = dir.into();
        let output_dir_err = |source| MapError::OutputDir {
            path: dir.clone(),
            source,
        };
        std::fs::create_dir_all(&dir).map_err(output_dir_err)?;
        tempfile::NamedTempFile::new_in(&dir).map_err(output_dir_err)?;
        Ok(Self {
            dir,
            reserved: HashSet::new(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Claim a file name for `label` at `at`.
    ///
    /// The first claim is `WiFiGeoMap_{label}_{timestamp}.html`; later claims
    /// for the same stem, or stems whose file already exists, get `_2`, `_3`,
    /// ... in call order.
    pub fn reserve_name(&mut self, label: &str, at: DateTime<Utc>) -> String {
        let stem = stem(label, at);
        let mut candidate = format!("{stem}.html");
        let mut counter = 2_u32;
        while self.reserved.contains(&candidate) || self.dir.join(&candidate).exists() {
            candidate = format!("{stem}_{counter}.html");
            counter += 1;
        }
        self.reserved.insert(candidate.clone());
        candidate
    }

    /// Write the map for one resolved SSID.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Write`] if the file cannot be written. The name
    /// stays reserved so later artifacts do not reuse it.
    pub fn emit_point(
        &mut self,
        ssid: &str,
        coordinate: Coordinate,
        address: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<ResolvedPoint, MapError> {
        let name = self.reserve_name(&sanitize_ssid(ssid), at);
        let point = ResolvedPoint {
            ssid: ssid.to_string(),
            lat: coordinate.lat,
            lon: coordinate.lon,
            resolved_at: at,
            map_file_name: name,
            address,
        };

        let page = render_page(
            &format!("WiFi location: {ssid}"),
            coordinate,
            POINT_ZOOM,
            &[Marker::from(&point)],
            false,
        );
        let path = self.dir.join(&point.map_file_name);
        publish_atomic(&path, page.as_bytes())?;
        tracing::debug!(path = %path.display(), %ssid, "point map written");
        Ok(point)
    }

    /// Write the summary map of every point in the run.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Write`] if the file cannot be written.
    pub fn emit_summary(
        &mut self,
        points: &[ResolvedPoint],
        at: DateTime<Utc>,
    ) -> Result<PathBuf, MapError> {
        let name = self.reserve_name(SUMMARY_LABEL, at);
        let markers: Vec<Marker> = points.iter().map(Marker::from).collect();
        let centre = centre_of(&markers);
        let page = render_page(
            &format!("WiFi locations: {} networks", markers.len()),
            centre,
            if markers.len() == 1 { POINT_ZOOM } else { SUMMARY_ZOOM },
            &markers,
            true,
        );
        let path = self.dir.join(name);
        publish_atomic(&path, page.as_bytes())?;
        tracing::debug!(path = %path.display(), points = markers.len(), "summary map written");
        Ok(path)
    }
}

/// Write `contents` to a temporary file next to `path`, then rename it into
/// place.
///
/// # Errors
///
/// Returns [`MapError::Write`] with `path` on any I/O failure; the temporary
/// file is removed.
pub fn publish_atomic(path: &Path, contents: &[u8]) -> Result<(), MapError> {
    let write_err = |source| MapError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|error| write_err(error.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn same_second_names_get_counters() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = MapEmitter::new(dir.path()).unwrap();
        assert_eq!(
            emitter.reserve_name("HomeNet42", at()),
            "WiFiGeoMap_HomeNet42_20250101_120000.html"
        );
        assert_eq!(
            emitter.reserve_name("HomeNet42", at()),
            "WiFiGeoMap_HomeNet42_20250101_120000_2.html"
        );
        assert_eq!(
            emitter.reserve_name("HomeNet42", at()),
            "WiFiGeoMap_HomeNet42_20250101_120000_3.html"
        );
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("WiFiGeoMap_HomeNet42_20250101_120000.html"),
            "old",
        )
        .unwrap();

        let mut emitter = MapEmitter::new(dir.path()).unwrap();
        let point = emitter
            .emit_point("HomeNet42", Coordinate::new(51.5, -0.12), None, at())
            .unwrap();
        assert_eq!(
            point.map_file_name,
            "WiFiGeoMap_HomeNet42_20250101_120000_2.html"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("WiFiGeoMap_HomeNet42_20250101_120000.html"))
                .unwrap(),
            "old"
        );
    }

    #[test]
    fn distinct_ssids_with_same_sanitized_form_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = MapEmitter::new(dir.path()).unwrap();
        let a = emitter
            .emit_point("Home Net", Coordinate::new(51.5, -0.12), None, at())
            .unwrap();
        let b = emitter
            .emit_point("Home/Net", Coordinate::new(51.6, -0.13), None, at())
            .unwrap();
        assert_ne!(a.map_file_name, b.map_file_name);
        assert!(dir.path().join(&a.map_file_name).is_file());
        assert!(dir.path().join(&b.map_file_name).is_file());
    }

    #[test]
    fn point_records_display_ssid_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = MapEmitter::new(dir.path()).unwrap();
        let point = emitter
            .emit_point(
                "Café Wi-Fi",
                Coordinate::new(48.8566, 2.3522),
                Some("Rue de Rivoli".into()),
                at(),
            )
            .unwrap();
        assert_eq!(point.ssid, "Café Wi-Fi");
        assert_eq!(point.resolved_at, at());
        assert_eq!(point.map_file_name, "WiFiGeoMap_Caf_Wi-Fi_20250101_120000.html");

        let html = std::fs::read_to_string(dir.path().join(&point.map_file_name)).unwrap();
        assert!(html.contains("Rue de Rivoli"));
        assert!(html.contains("Café Wi-Fi"));
    }

    #[test]
    fn summary_with_no_points_uses_default_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = MapEmitter::new(dir.path()).unwrap();
        let path = emitter.emit_summary(&[], at()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "WiFiGeoMap_Summary_20250101_120000.html"
        );
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("const markers = [];"));
        assert!(html.contains("setView([51.5074, -0.1278], 6)"));
    }

    #[test]
    fn unwritable_output_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();
        let err = MapEmitter::new(file.join("maps")).unwrap_err();
        assert!(matches!(err, MapError::OutputDir { .. }));
    }
}
