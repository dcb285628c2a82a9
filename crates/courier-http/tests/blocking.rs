//! Blocking facade against the echo server

mod common;

use std::io::Cursor;

use courier_http::blocking;
use courier_http::{ClientConfig, File, FileMap, HttpError, HttpMethod, Values};
use serde_json::Value;
use tokio::runtime::Runtime;

/// Runs the echo server on its own runtime; keep the runtime alive for the test
fn start_echo() -> (Runtime, String) {
    let runtime = Runtime::new().expect("echo server runtime");
    let base = runtime.block_on(common::spawn_echo_server());
    (runtime, base)
}

#[test]
fn test_blocking_round_trip() {
    let (_server, base) = start_echo();
    let client = blocking::Client::from_base_url(base).unwrap();

    let buf: Value = client
        .get("/search", Some(&Values::from([("term", "some string")])))
        .unwrap();
    assert_eq!(buf["method"], "GET");
    assert_eq!(buf["url"], "/search?term=some+string");

    let buf: Value = client
        .post("/search?foo=the+quick", Some(&Values::from([("bar", "brown fox")])))
        .unwrap();
    assert_eq!(buf["method"], "POST");
    assert_eq!(buf["get"]["foo"][0], "the quick");
    assert_eq!(buf["post"]["bar"][0], "brown fox");

    let buf: Value = client.put("/search?foo=the+quick", None).unwrap();
    assert_eq!(buf["method"], "PUT");

    let buf: Value = client.delete("/search?foo=the+quick", None).unwrap();
    assert_eq!(buf["method"], "DELETE");
    assert_eq!(buf["get"]["foo"][0], "the quick");
}

#[test]
fn test_blocking_multipart() {
    let (_server, base) = start_echo();
    let client = blocking::Client::from_base_url(base).unwrap();

    let mut source = Cursor::new(b"package main".to_vec());
    let mut files = FileMap::new();
    files.insert("file".into(), vec![File::new("main.go", &mut source)]);

    let body = client
        .create_multipart_body(Some(&Values::from([("foo", "bar")])), Some(files))
        .unwrap();
    let buf: Value = client.put_multipart("/put", body).unwrap();

    assert_eq!(buf["method"], "PUT");
    assert_eq!(buf["files"]["file"][0]["Filename"], "main.go");
    assert_eq!(buf["post"]["foo"][0], "bar");

    let body = client.create_multipart_body(None, None).unwrap();
    let buf: Value = client.post_multipart("/post", body).unwrap();
    assert_eq!(buf["method"], "POST");
    assert_eq!(buf["files"], serde_json::json!({}));
}

#[test]
fn test_blocking_raw_bytes_from_default_client() {
    let (_server, base) = start_echo();

    let response = blocking::send(HttpMethod::Get, &format!("{}/bytes", base), None).unwrap();
    assert!(!response.bytes().is_empty());
    assert!(response.text().contains("\"method\":\"GET\""));

    let buf: Value = blocking::get(&format!("{}/search", base), None).unwrap();
    assert_eq!(buf["url"], "/search");
}

#[test]
fn test_blocking_decode_mismatch() {
    let (_server, base) = start_echo();
    let client = blocking::Client::new(ClientConfig::new().base_url(base)).unwrap();

    let err = client.get::<u32>("/search", None).unwrap_err();
    assert!(matches!(err, HttpError::Decode(_)));
}

#[test]
fn test_blocking_shared_across_threads() {
    let (_server, base) = start_echo();
    let client = blocking::Client::from_base_url(base).unwrap();

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let client = client.clone();
            std::thread::spawn(move || {
                let params = Values::from([("n", i.to_string())]);
                let buf: Value = client.get("/threads", Some(&params)).unwrap();
                buf["get"]["n"][0].as_str().unwrap().to_string()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i.to_string());
    }
}
