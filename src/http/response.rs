//! HTTP response building module
//!
//! Builders for the responses the host and the REST application send.
//! They never panic: a builder failure is logged and an empty response returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde_json::Value;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const JSON_CONTENT_TYPE: &str = "application/json";

fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

fn plain(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain");
    finish(builder, Bytes::from_static(text.as_bytes()), status.as_str())
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    plain(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build health probe response
pub fn build_health_response(healthy: bool) -> Response<Full<Bytes>> {
    if healthy {
        plain(StatusCode::OK, "ok")
    } else {
        plain(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

/// Build 405 with the allowed methods
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", allow);
    finish(builder, Bytes::from_static(b"405 Method Not Allowed"), "405")
}

/// Build a JSON response; `HEAD` keeps the length but drops the body
pub fn build_json_response(status: StatusCode, value: &Value, is_head: bool) -> Response<Full<Bytes>> {
    let data = Bytes::from(value.to_string());
    let builder = Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Content-Length", data.len());
    let body = if is_head { Bytes::new() } else { data };
    finish(builder, body, "JSON")
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache");
    finish(builder, Bytes::new(), "304")
}

/// Build 200 icon response. `no-cache` makes clients revalidate every time.
pub fn build_icon_response(data: Bytes, etag: &str, is_head: bool) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", SVG_CONTENT_TYPE)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "no-cache");
    let body = if is_head { Bytes::new() } else { data };
    finish(builder, body, "icon")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_icon_response_headers() {
        let resp = build_icon_response(Bytes::from_static(b"<svg/>"), "\"e\"", false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], SVG_CONTENT_TYPE);
        assert_eq!(resp.headers()["content-length"], "6");
        assert_eq!(resp.headers()["etag"], "\"e\"");
        assert_eq!(body_of(resp).await, Bytes::from_static(b"<svg/>"));
    }

    #[tokio::test]
    async fn test_head_drops_body() {
        let resp = build_icon_response(Bytes::from_static(b"<svg/>"), "\"e\"", true);
        assert_eq!(resp.headers()["content-length"], "6");
        assert!(body_of(resp).await.is_empty());

        let resp = build_json_response(StatusCode::OK, &json!({"a": 1}), true);
        assert!(body_of(resp).await.is_empty());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(build_500_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(build_405_response("GET").headers()["allow"], "GET");
        assert_eq!(build_304_response("\"e\"").status(), StatusCode::NOT_MODIFIED);
        assert_eq!(build_health_response(false).status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
