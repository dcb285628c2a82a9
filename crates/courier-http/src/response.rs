//! HTTP response types

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use courier_common::HttpStatus;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::{HttpError, HttpResult};

/// Longest body excerpt carried in logs and status errors
const PREVIEW_LIMIT: usize = 1024;

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: HttpStatus,

    /// Response headers, names lowercased. Repeated headers are joined
    /// with `", "` in arrival order.
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Bytes,

    /// Request latency in milliseconds
    pub latency_ms: u64,

    /// Final URL (may differ from request URL due to redirects)
    pub url: String,
}

impl HttpResponse {
    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the JSON body into `T`.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>`
    /// accept `204 No Content` responses.
    pub fn json<T: DeserializeOwned>(&self) -> HttpResult<T> {
        let body: &[u8] = if self.body.is_empty() {
            b"null"
        } else {
            &self.body
        };
        Ok(serde_json::from_slice(body)?)
    }

    /// Raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Get latency as Duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Lossy UTF-8 excerpt of the body, cut at 1 KiB
    pub fn body_preview(&self) -> String {
        let end = self.body.len().min(PREVIEW_LIMIT);
        let mut preview = String::from_utf8_lossy(&self.body[..end]).into_owned();
        if self.body.len() > PREVIEW_LIMIT {
            preview.push_str("...");
        }
        preview
    }

    /// Turn a non-2xx response into `HttpError::Status`
    pub fn error_for_status(self) -> HttpResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::Status {
                status: self.status,
                body: self.body_preview(),
            })
        }
    }
}

/// Convert reqwest Response to HttpResponse
pub(crate) async fn from_reqwest(
    response: reqwest::Response,
    latency_ms: u64,
) -> HttpResult<HttpResponse> {
    let status = HttpStatus(response.status().as_u16());
    let url = response.url().to_string();

    let headers = collect_headers(response.headers());
    let body = response.bytes().await?;

    Ok(HttpResponse {
        status,
        headers,
        body,
        latency_ms,
        url,
    })
}

/// Flatten a header map, joining repeated values; non-UTF-8 values are skipped
fn collect_headers(map: &HeaderMap) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(status: u16, body: &'static [u8]) -> HttpResponse {
        HttpResponse {
            status: HttpStatus(status),
            headers: HashMap::from([(
                "content-type".to_string(),
                "application/json".to_string(),
            )]),
            body: Bytes::from_static(body),
            latency_ms: 3,
            url: "http://localhost/".to_string(),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        method: String,
    }

    #[test]
    fn test_json_into_struct() {
        let echo: Echo = response(200, br#"{"method": "GET", "extra": 1}"#).json().unwrap();
        assert_eq!(echo.method, "GET");
    }

    #[test]
    fn test_json_shape_mismatch_is_decode_error() {
        let err = response(200, br#"{"method": 7}"#).json::<Echo>().unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));

        let err = response(200, b"<html></html>")
            .json::<serde_json::Value>()
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let resp = response(204, b"");
        resp.json::<()>().unwrap();
        assert_eq!(resp.json::<Option<Echo>>().unwrap(), None);
        assert!(resp.json::<Echo>().is_err());
    }

    #[test]
    fn test_header_case_insensitive() {
        let resp = response(200, b"{}");
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("x-missing"), None);
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let mut map = HeaderMap::new();
        map.append("set-cookie", "a=1".parse().unwrap());
        map.append("set-cookie", "b=2".parse().unwrap());
        map.insert("content-type", "text/plain".parse().unwrap());
        map.insert("x-raw", reqwest::header::HeaderValue::from_bytes(b"\xff").unwrap());

        let headers = collect_headers(&map);
        assert_eq!(headers["set-cookie"], "a=1, b=2");
        assert_eq!(headers["content-type"], "text/plain");
        assert!(!headers.contains_key("x-raw"));
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(201, b"{}").error_for_status().is_ok());

        let err = response(404, b"not here").error_for_status().unwrap_err();
        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status, HttpStatus::NOT_FOUND);
                assert_eq!(body, "not here");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_body_preview_truncates() {
        static LONG: [u8; 2048] = [b'a'; 2048];
        let preview = response(200, &LONG).body_preview();
        assert_eq!(preview.len(), PREVIEW_LIMIT + 3);
        assert!(preview.ends_with("..."));
    }
}
