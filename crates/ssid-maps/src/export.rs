//! Tabular export of resolved points.

use std::path::Path;

use serde::Serialize;
use ssid_core::entities::ResolvedPoint;

use crate::{MapError, publish_atomic};

const HEADER: [&str; 6] = ["ssid", "lat", "lon", "address", "resolved_at", "map_file"];

#[derive(Serialize)]
struct Row<'a> {
    ssid: &'a str,
    lat: f64,
    lon: f64,
    address: &'a str,
    resolved_at: String,
    map_file: &'a str,
}

/// Write `points` as CSV to `path`, replacing any previous export. The header
/// row is always written, so a run without results still yields a valid file.
///
/// # Errors
///
/// Returns [`MapError::Csv`] if a row cannot be encoded and
/// [`MapError::Write`] if the file cannot be published.
pub fn write_points_csv(path: &Path, points: &[ResolvedPoint]) -> Result<(), MapError> {
    let csv_err = |source| MapError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER).map_err(csv_err)?;
    for point in points {
        writer
            .serialize(Row {
                ssid: &point.ssid,
                lat: point.lat,
                lon: point.lon,
                address: point.address.as_deref().unwrap_or_default(),
                resolved_at: point.resolved_at.to_rfc3339(),
                map_file: &point.map_file_name,
            })
            .map_err(csv_err)?;
    }
    let contents = writer.into_inner().map_err(|error| MapError::Write {
        path: path.to_path_buf(),
        source: error.into_error(),
    })?;

    publish_atomic(path, &contents)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn point(ssid: &str, address: Option<&str>) -> ResolvedPoint {
        ResolvedPoint {
            ssid: ssid.into(),
            lat: 51.5,
            lon: -0.12,
            resolved_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            map_file_name: format!("WiFiGeoMap_{ssid}_20250101_120000.html"),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn writes_header_and_one_row_per_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapped_results.csv");
        write_points_csv(
            &path,
            &[
                point("HomeNet42", Some("Baker Street, London")),
                point("Cafe", None),
            ],
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ssid,lat,lon,address,resolved_at,map_file");
        assert_eq!(
            lines[1],
            "HomeNet42,51.5,-0.12,\"Baker Street, London\",2025-01-01T12:00:00+00:00,WiFiGeoMap_HomeNet42_20250101_120000.html"
        );
        assert!(lines[2].starts_with("Cafe,51.5,-0.12,,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_run_still_has_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapped_results.csv");
        std::fs::write(&path, "stale").unwrap();

        write_points_csv(&path, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "ssid,lat,lon,address,resolved_at,map_file\n"
        );
    }
}
