//! URL resolution and request preparation

use courier_common::{HttpMethod, Values};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use url::Url;

use crate::error::{HttpError, HttpResult};
use crate::multipart::MultipartBody;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Convert HttpMethod to reqwest Method
fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

/// Resolve `path` against an optional base URL.
///
/// Absolute `http(s)://` paths are used as given. Otherwise the path is
/// appended to the base path, so `http://host/api` + `/search` gives
/// `http://host/api/search`. A query on the base comes first, followed by
/// any query carried in `path`.
pub(crate) fn resolve_url(base: Option<&Url>, path: &str) -> HttpResult<Url> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(Url::parse(path)?);
    }

    let base = base.ok_or_else(|| {
        HttpError::InvalidUrl(format!(
            "relative path '{}' requires a client base URL",
            path
        ))
    })?;

    let (rest, fragment) = match path.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (path, None),
    };
    let (rel_path, rel_query) = match rest.split_once('?') {
        Some((rel_path, query)) => (rel_path, Some(query)),
        None => (rest, None),
    };

    let mut url = base.clone();
    url.set_path(&format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        rel_path.trim_start_matches('/')
    ));

    let query = match (
        base.query().filter(|q| !q.is_empty()),
        rel_query.filter(|q| !q.is_empty()),
    ) {
        (Some(base_query), Some(rel_query)) => Some(format!("{}&{}", base_query, rel_query)),
        (Some(query), None) | (None, Some(query)) => Some(query.to_string()),
        (None, None) => None,
    };
    url.set_query(query.as_deref());
    url.set_fragment(fragment);

    Ok(url)
}

/// Append encoded params after any query already on the URL
fn append_query(url: &mut Url, params: &Values) {
    if params.is_empty() {
        return;
    }
    let encoded = params.encode();
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
        _ => encoded,
    };
    url.set_query(Some(&query));
}

/// Body carried by a prepared request
pub(crate) enum Payload {
    Empty,
    Form(String),
    Multipart(MultipartBody),
}

/// A fully resolved request, ready to hand to the transport
pub(crate) struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub payload: Payload,
}

impl PreparedRequest {
    /// Place `params` in the query string or a form body, depending on the method
    pub fn with_params(method: HttpMethod, mut url: Url, params: Option<&Values>) -> Self {
        let payload = if method.params_in_body() {
            Payload::Form(params.map(Values::encode).unwrap_or_default())
        } else {
            if let Some(params) = params {
                append_query(&mut url, params);
            }
            Payload::Empty
        };

        Self {
            method,
            url,
            payload,
        }
    }

    pub fn multipart(method: HttpMethod, url: Url, body: MultipartBody) -> Self {
        Self {
            method,
            url,
            payload: Payload::Multipart(body),
        }
    }

    pub fn content_type(&self) -> Option<String> {
        match &self.payload {
            Payload::Empty => None,
            Payload::Form(_) => Some(FORM_CONTENT_TYPE.to_string()),
            Payload::Multipart(body) => Some(body.content_type()),
        }
    }

    pub fn body_len(&self) -> usize {
        match &self.payload {
            Payload::Empty => 0,
            Payload::Form(form) => form.len(),
            Payload::Multipart(body) => body.len(),
        }
    }

    /// Build a reqwest RequestBuilder carrying `headers` plus the payload
    pub fn into_reqwest(
        self,
        client: &reqwest::Client,
        headers: &HeaderMap,
    ) -> HttpResult<reqwest::RequestBuilder> {
        let mut request_headers = headers.clone();
        if let Some(content_type) = self.content_type() {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| HttpError::InvalidRequest(format!("Bad content type: {}", e)))?;
            request_headers.insert(CONTENT_TYPE, value);
        }

        let builder = client
            .request(to_reqwest_method(self.method), self.url)
            .headers(request_headers);

        Ok(match self.payload {
            Payload::Empty => builder,
            Payload::Form(form) => builder.body(form),
            Payload::Multipart(body) => builder.body(body.into_bytes()),
        })
    }
}
