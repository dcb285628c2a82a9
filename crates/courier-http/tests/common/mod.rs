//! Echo server shared by the integration tests.
//!
//! Replies with a JSON description of the request it received:
//! method, url, query values (`get`), form values (`post`), uploaded
//! files, and headers.

#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Uri};
use axum::{Json, Router};
use courier_http::Values;
use serde_json::{json, Map, Value};

/// Start the echo server on an ephemeral port and return its base URL
pub async fn spawn_echo_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind echo server");
    let addr = listener.local_addr().expect("echo server address");
    let app = Router::new().fallback(echo);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("echo server");
    });

    format!("http://{}", addr)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut post = Values::new();
    let mut files: BTreeMap<String, Vec<Value>> = BTreeMap::new();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        post = Values::parse(&String::from_utf8_lossy(&body));
    } else if content_type.starts_with("multipart/form-data") {
        let boundary = multer::parse_boundary(&content_type).expect("multipart boundary");
        let stream = futures_util::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        while let Some(field) = multipart.next_field().await.expect("multipart field") {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let part_type = field.content_type().map(|m| m.to_string());
                    let data = field.bytes().await.expect("file part");
                    files.entry(name).or_default().push(json!({
                        "Filename": filename,
                        "Size": data.len(),
                        "ContentType": part_type,
                        "Content": String::from_utf8_lossy(&data),
                    }));
                }
                None => {
                    let text = field.text().await.expect("form field");
                    post.add(name, text);
                }
            }
        }
    }

    let get = Values::parse(uri.query().unwrap_or_default());
    let header: Map<String, Value> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v.to_str().unwrap_or_default())))
        .collect();

    Json(json!({
        "method": method.as_str(),
        "url": uri.to_string(),
        "get": values_json(&get),
        "post": values_json(&post),
        "files": files,
        "header": header,
    }))
}

fn values_json(values: &Values) -> Value {
    values
        .iter()
        .map(|(k, v)| (k.clone(), json!(v)))
        .collect::<Map<String, Value>>()
        .into()
}
