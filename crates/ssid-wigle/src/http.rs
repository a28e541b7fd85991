//! Response classification for WiGLE API calls.
//!
//! Every response goes through [`read_body`], which turns status codes into
//! [`LookupError`] variants before the body is parsed.

use reqwest::StatusCode;

use crate::error::LookupError;

/// Longest response body kept in an [`LookupError::Api`] message.
const MAX_ERROR_BODY: usize = 512;

/// Wait assumed when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Read the body of a successful response.
///
/// 429 becomes [`LookupError::RateLimited`]; any other non-2xx status becomes
/// [`LookupError::Api`] carrying WiGLE's `message` field when the error body
/// is JSON, else the raw body cut to 512 bytes.
pub async fn read_body(resp: reqwest::Response) -> Result<String, LookupError> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LookupError::RateLimited {
            retry_after_secs: retry_after_secs(&resp),
        });
    }

    let body = resp.text().await;
    if status.is_success() {
        return Ok(body?);
    }
    Err(LookupError::Api {
        status: status.as_u16(),
        message: error_message(&body.unwrap_or_default()),
    })
}

fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));
    let mut message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    message
}
