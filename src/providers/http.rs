//! HTTP plumbing shared by the exchange sources

use crate::{
    constants::{MAX_ERROR_BODY_CHARS, MAX_RESPONSE_BODY_BYTES, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::{ConfigError, SourceError},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Extracts a human-readable message from an exchange's error body
pub(crate) type ErrorBodyDecoder = fn(&str) -> Option<String>;

/// Builds the HTTP client shared by all sources
pub fn build_client() -> Result<Client, ConfigError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;

    Ok(client)
}

/// Sends a request and decodes a successful JSON body
///
/// Non-success statuses become [`SourceError::RemoteError`], using the
/// exchange's structured error body when `decode_error` understands it and the
/// raw status otherwise.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    exchange: &'static str,
    decode_error: ErrorBodyDecoder,
) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    let body = read_body(response, exchange).await?;

    if !status.is_success() {
        let message = decode_error(&body).unwrap_or_else(|| raw_error_message(status, &body));
        return Err(SourceError::remote(status.as_u16(), message));
    }

    serde_json::from_str(&body).map_err(|e| {
        SourceError::DecodeError(format!(
            "{} response: {}. Response: {}",
            exchange,
            e,
            truncate(&body)
        ))
    })
}

/// Reads the body in chunks, giving up past [`MAX_RESPONSE_BODY_BYTES`]
async fn read_body(mut response: Response, exchange: &'static str) -> Result<String, SourceError> {
    let too_large = || {
        SourceError::DecodeError(format!(
            "{} response exceeds {} bytes",
            exchange, MAX_RESPONSE_BODY_BYTES
        ))
    };

    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BODY_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_RESPONSE_BODY_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn raw_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, truncate(body))
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client().is_ok());
    }

    #[test]
    fn test_raw_error_message() {
        assert_eq!(
            raw_error_message(reqwest::StatusCode::BAD_GATEWAY, "  "),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            raw_error_message(reqwest::StatusCode::NOT_FOUND, "<html>nope</html>"),
            "HTTP 404 Not Found: <html>nope</html>"
        );
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        assert_eq!(truncate(&body).len(), MAX_ERROR_BODY_CHARS);
    }
}
