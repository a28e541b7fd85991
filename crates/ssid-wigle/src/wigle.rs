//! WiGLE network search client.

use std::time::Duration;

use serde::Deserialize;
use ssid_config::WigleConfig;
use ssid_core::entities::Coordinate;
use ssid_core::enums::NotFoundReason;

use crate::{LocationSource, LookupError, LookupOutcome, http::read_body};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    success: bool,
    #[serde(default)]
    result_count: u64,
    #[serde(default)]
    results: Vec<NetworkResult>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct NetworkResult {
    trilat: Option<f64>,
    trilong: Option<f64>,
    road: Option<String>,
    city: Option<String>,
}

/// HTTP client for the WiGLE `network/search` endpoint.
#[derive(Debug, Clone)]
pub struct WigleClient {
    http: reqwest::Client,
    endpoint: String,
    api_name: String,
    api_token: String,
}

impl WigleClient {
    /// Build a client from the `[wigle]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::MissingCredentials`] when either credential is
    /// empty, or [`LookupError::Http`] if the HTTP client fails to build.
    pub fn from_config(config: &WigleConfig) -> Result<Self, LookupError> {
        if !config.is_configured() {
            return Err(LookupError::MissingCredentials);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("ssidmap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_name: config.api_name.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn search_url(&self, ssid: &str) -> String {
        format!(
            "{}?ssid={}&resultsPerPage=1",
            self.endpoint,
            urlencoding::encode(ssid)
        )
    }
}

impl LocationSource for WigleClient {
    fn source_name(&self) -> &str {
        "wigle"
    }

    async fn lookup(&self, ssid: &str) -> Result<LookupOutcome, LookupError> {
        let url = self.search_url(ssid);
        tracing::debug!(%ssid, "querying WiGLE");
        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.api_name, Some(&self.api_token))
            .send()
            .await?;
        let body = read_body(resp).await?;
        parse_search_response(&body)
    }
}

/// Map a `network/search` body onto a lookup outcome.
fn parse_search_response(body: &str) -> Result<LookupOutcome, LookupError> {
    let data: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    if !data.success {
        return Err(LookupError::Rejected(
            data.message
                .unwrap_or_else(|| String::from("service reported success=false")),
        ));
    }

    let Some(first) = data.results.into_iter().next() else {
        return Ok(LookupOutcome::NoData(NotFoundReason::NoResults));
    };
    if data.result_count == 0 {
        tracing::debug!("resultCount is 0 but results were returned; using the first");
    }

    match (first.trilat, first.trilong) {
        (Some(lat), Some(lon)) => Ok(LookupOutcome::Found {
            coordinate: Coordinate::new(lat, lon),
            address: join_address(first.road, first.city),
        }),
        _ => Ok(LookupOutcome::NoData(NotFoundReason::MissingCoordinates)),
    }
}

fn join_address(road: Option<String>, city: Option<String>) -> Option<String> {
    let parts: Vec<String> = [road, city]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FOUND_FIXTURE: &str = r#"{
        "success": true,
        "totalResults": 14,
        "resultCount": 1,
        "searchAfter": "1234",
        "results": [
            {
                "trilat": 51.50123,
                "trilong": -0.12456,
                "ssid": "HomeNet42",
                "road": "Baker Street",
                "city": "London",
                "country": "GB"
            }
        ]
    }"#;

    #[test]
    fn parse_found_response() {
        let outcome = parse_search_response(FOUND_FIXTURE).unwrap();
        assert_eq!(
            outcome,
            LookupOutcome::Found {
                coordinate: Coordinate::new(51.50123, -0.12456),
                address: Some("Baker Street, London".into()),
            }
        );
    }

    #[test]
    fn parse_empty_results() {
        let body = r#"{"success": true, "totalResults": 0, "resultCount": 0, "results": []}"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            LookupOutcome::NoData(NotFoundReason::NoResults)
        );
    }

    #[test]
    fn parse_missing_results_field() {
        let body = r#"{"success": true, "resultCount": 0}"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            LookupOutcome::NoData(NotFoundReason::NoResults)
        );
    }

    #[test]
    fn parse_result_without_position() {
        let body = r#"{"success": true, "resultCount": 1,
            "results": [{"trilat": null, "trilong": -0.1, "road": null}]}"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            LookupOutcome::NoData(NotFoundReason::MissingCoordinates)
        );
    }

    #[test]
    fn parse_unsuccessful_response() {
        let body = r#"{"success": false, "message": "too many queries today"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, LookupError::Rejected(ref m) if m == "too many queries today"));
    }

    #[test]
    fn parse_garbage_is_malformed() {
        let err = parse_search_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[test]
    fn search_url_encodes_ssid() {
        let config = WigleConfig {
            api_name: "AID".into(),
            api_token: "tok".into(),
            ..WigleConfig::default()
        };
        let client = WigleClient::from_config(&config).unwrap();
        assert_eq!(
            client.search_url("Café & Co"),
            "https://api.wigle.net/api/v2/network/search?ssid=Caf%C3%A9%20%26%20Co&resultsPerPage=1"
        );
    }

    #[test]
    fn missing_credentials_are_refused() {
        let err = WigleClient::from_config(&WigleConfig::default()).unwrap_err();
        assert!(matches!(err, LookupError::MissingCredentials));
    }

    #[test]
    fn address_skips_blank_parts() {
        assert_eq!(join_address(Some("  ".into()), Some("Leeds".into())), Some("Leeds".into()));
        assert_eq!(join_address(None, None), None);
    }
}
