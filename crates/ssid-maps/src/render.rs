//! Leaflet page rendering.
//!
//! Pages load Leaflet from a CDN and draw OpenStreetMap tiles. Marker data is
//! embedded as a JSON array; popups are built from text nodes so SSIDs never
//! reach the page as markup.

use std::fmt::Write as _;

use serde::Serialize;
use ssid_core::entities::{Coordinate, ResolvedPoint};

const LEAFLET_VERSION: &str = "1.9.4";

/// View used when there is nothing to centre on (central London).
pub const DEFAULT_CENTRE: Coordinate = Coordinate::new(51.5074, -0.1278);

/// Zoom for a single-point map.
pub const POINT_ZOOM: u8 = 15;

/// Zoom for the summary map when it has no points to fit.
pub const SUMMARY_ZOOM: u8 = 6;

/// One marker on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub ssid: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<&ResolvedPoint> for Marker {
    fn from(point: &ResolvedPoint) -> Self {
        Self {
            ssid: point.ssid.clone(),
            lat: point.lat,
            lon: point.lon,
            address: point.address.clone(),
        }
    }
}

/// Mean position of `markers`, or [`DEFAULT_CENTRE`] when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centre_of(markers: &[Marker]) -> Coordinate {
    if markers.is_empty() {
        return DEFAULT_CENTRE;
    }
    let n = markers.len() as f64;
    let lat = markers.iter().map(|m| m.lat).sum::<f64>() / n;
    let lon = markers.iter().map(|m| m.lon).sum::<f64>() / n;
    Coordinate::new(lat, lon)
}

/// Render a complete HTML page.
///
/// `fit_bounds` zooms the view to contain every marker once the page loads
/// (used by the summary map when it has two or more points).
#[must_use]
pub fn render_page(
    title: &str,
    centre: Coordinate,
    zoom: u8,
    markers: &[Marker],
    fit_bounds: bool,
) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(html, "    <title>{}</title>", escape_html(title));
    let _ = writeln!(
        html,
        "    <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css\">"
    );
    let _ = writeln!(
        html,
        "    <script src=\"https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js\"></script>"
    );
    html.push_str("    <style>html, body, #map { height: 100%; margin: 0; }</style>\n");
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");

    let _ = writeln!(html, "const markers = {};", script_safe_json(markers));
    let _ = writeln!(
        html,
        "const map = L.map('map').setView([{}, {}], {zoom});",
        centre.lat, centre.lon
    );
    html.push_str(
        "L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {\n\
         \x20   maxZoom: 19,\n\
         \x20   attribution: '&copy; OpenStreetMap contributors'\n\
         }).addTo(map);\n",
    );
    html.push_str(
        "const layer = L.featureGroup().addTo(map);\n\
         for (const m of markers) {\n\
         \x20   const popup = document.createElement('div');\n\
         \x20   const name = document.createElement('strong');\n\
         \x20   name.textContent = m.ssid;\n\
         \x20   popup.appendChild(name);\n\
         \x20   popup.appendChild(document.createElement('br'));\n\
         \x20   popup.appendChild(document.createTextNode(m.lat.toFixed(6) + ', ' + m.lon.toFixed(6)));\n\
         \x20   if (m.address) {\n\
         \x20       popup.appendChild(document.createElement('br'));\n\
         \x20       popup.appendChild(document.createTextNode(m.address));\n\
         \x20   }\n\
         \x20   L.marker([m.lat, m.lon], { title: m.ssid }).bindPopup(popup).addTo(layer);\n\
         }\n",
    );
    if fit_bounds {
        html.push_str("if (markers.length > 1) { map.fitBounds(layer.getBounds().pad(0.1)); }\n");
    }
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

/// Serialize markers as JSON that cannot close the surrounding `<script>`.
fn script_safe_json(markers: &[Marker]) -> String {
    let json = serde_json::to_string(markers).unwrap_or_else(|_| String::from("[]"));
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
