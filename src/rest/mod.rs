//! REST application module
//!
//! The application mounted behind the forwarder. Routes are resolved
//! relative to the mount point carried in the [`HostContext`] extension:
//!
//! | Route               | Methods   | Result                           |
//! |---------------------|-----------|----------------------------------|
//! | `/`                 | GET, HEAD | JSON description of the service  |
//! | `/icon/{type}?k=v`  | GET, HEAD | `image/svg+xml`, or a JSON 404   |

mod error;

pub use error::{RestError, Result};

use crate::forward::HostContext;
use crate::http::{self, cache};
use crate::icons::{Attributes, TypeHandler};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;
use std::future::Future;
use std::io::Read;
use std::pin::Pin;
use std::sync::Arc;

const ALLOWED_METHODS: &str = "GET, HEAD";

/// Serves icons from a [`TypeHandler`]
#[derive(Clone)]
pub struct RestApplication {
    handler: Arc<dyn TypeHandler>,
}

impl RestApplication {
    pub fn new(handler: Arc<dyn TypeHandler>) -> Self {
        Self { handler }
    }
}

impl<B> Service<Request<B>> for RestApplication {
    type Response = Response<Full<Bytes>>;
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        // No route reads a body
        let (parts, _body) = req.into_parts();
        let handler = Arc::clone(&self.handler);
        Box::pin(async move { dispatch(parts, handler).await })
    }
}

/// Routes known to the application
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Index,
    Icon(String),
    BadRequest(&'static str),
    NotFound,
}

impl Route {
    fn parse(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Self::Index;
        }
        match trimmed.split_once('/') {
            Some(("icon", raw)) if !raw.is_empty() && !raw.contains('/') => {
                match urlencoding::decode(raw) {
                    Ok(type_name) => Self::Icon(type_name.into_owned()),
                    Err(_) => Self::BadRequest("type is not valid UTF-8"),
                }
            }
            _ => Self::NotFound,
        }
    }
}

async fn dispatch(parts: Parts, handler: Arc<dyn TypeHandler>) -> Result<Response<Full<Bytes>>> {
    let path = parts.uri.path();
    let context = parts.extensions.get::<HostContext>();
    let relative = context
        .and_then(|ctx| ctx.relative_path(path))
        .unwrap_or(path);
    let route = Route::parse(relative);
    let is_head = parts.method == Method::HEAD;
    let method_allowed = is_head || parts.method == Method::GET;

    match route {
        Route::NotFound => Ok(http::build_json_response(
            StatusCode::NOT_FOUND,
            &json!({ "error": "no such resource", "path": relative }),
            is_head,
        )),
        _ if !method_allowed => Ok(http::build_405_response(ALLOWED_METHODS)),
        Route::Index => Ok(http::build_json_response(
            StatusCode::OK,
            &json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "server": context.map(|ctx| ctx.server_name.as_str()),
                "resources": ["icon"],
            }),
            is_head,
        )),
        Route::BadRequest(reason) => Ok(http::build_json_response(
            StatusCode::BAD_REQUEST,
            &json!({ "error": reason }),
            is_head,
        )),
        Route::Icon(type_name) => {
            let attributes = parse_attributes(parts.uri.query());
            serve_icon(handler, type_name, attributes, &parts, is_head).await
        }
    }
}

async fn serve_icon(
    handler: Arc<dyn TypeHandler>,
    type_name: String,
    attributes: Attributes,
    parts: &Parts,
    is_head: bool,
) -> Result<Response<Full<Bytes>>> {
    // Opening and reading the resource blocks
    let lookup = type_name.clone();
    let data =
        tokio::task::spawn_blocking(move || read_icon(handler.as_ref(), &lookup, &attributes))
            .await??;

    let Some(data) = data else {
        return Ok(http::build_json_response(
            StatusCode::NOT_FOUND,
            &json!({ "error": "icon not found", "type": type_name }),
            is_head,
        ));
    };

    let etag = cache::generate_etag(&data);
    if cache::is_not_modified(&parts.headers, &etag) {
        return Ok(http::build_304_response(&etag));
    }
    Ok(http::build_icon_response(data, &etag, is_head))
}

fn read_icon(
    handler: &dyn TypeHandler,
    type_name: &str,
    attributes: &Attributes,
) -> Result<Option<Bytes>> {
    let Some(mut stream) = handler.get_stream(type_name, attributes) else {
        return Ok(None);
    };
    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .map_err(|source| RestError::Read {
            type_name: type_name.to_string(),
            source,
        })?;
    logger::log_debug(&format!("[Icons] Read {} bytes for '{type_name}'", buf.len()));
    Ok(Some(Bytes::from(buf)))
}

/// Decode `a=1&b=two+words` into attributes; later keys win, bad pairs are skipped
fn parse_attributes(query: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    let Some(query) = query else {
        return attributes;
    };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let decode = |s: &str| urlencoding::decode(&s.replace('+', " ")).map(|c| c.into_owned());
        match (decode(key), decode(value)) {
            (Ok(k), Ok(v)) if !k.is_empty() => {
                attributes.insert(k, v);
            }
            _ => logger::log_debug(&format!("[Rest] Skipping query pair '{pair}'")),
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::Forwarder;
    use crate::icons::{BasicTypeHandler, IconStream};
    use http_body_util::BodyExt;
    use hyper::header::{ETAG, IF_NONE_MATCH};

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }
    }

    struct BrokenHandler;

    impl TypeHandler for BrokenHandler {
        fn get_stream(&self, _type_name: &str, _attributes: &Attributes) -> Option<IconStream> {
            Some(Box::new(Unreadable))
        }
    }

    fn fixture() -> (tempfile::TempDir, Forwarder<RestApplication>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("personnode.svg"), "<svg id=\"p\"/>").unwrap();
        let app = RestApplication::new(Arc::new(BasicTypeHandler::new(dir.path())));
        let forwarder = Forwarder::new(app, HostContext::new("/rest", "test"));
        (dir, forwarder)
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Index);
        assert_eq!(Route::parse("/icon/Person%20Node"), Route::Icon("Person Node".into()));
        assert_eq!(Route::parse("/icon/"), Route::NotFound);
        assert_eq!(Route::parse("/icon/a/b"), Route::NotFound);
        assert_eq!(Route::parse("/icons"), Route::NotFound);
        assert!(matches!(Route::parse("/icon/%FF"), Route::BadRequest(_)));
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(Some("color=red&size=large+icon&flag&=x&color=blue"));
        assert_eq!(attrs.get("color").map(String::as_str), Some("blue"));
        assert_eq!(attrs.get("size").map(String::as_str), Some("large icon"));
        assert_eq!(attrs.get("flag").map(String::as_str), Some(""));
        assert_eq!(attrs.len(), 3);
        assert!(parse_attributes(None).is_empty());
    }

    #[tokio::test]
    async fn test_icon_served_through_forwarder() {
        let (_dir, forwarder) = fixture();
        let resp = forwarder
            .call(get("/rest/icon/Person-Node?color=red"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "image/svg+xml");
        assert_eq!(body_of(resp).await, Bytes::from("<svg id=\"p\"/>"));
    }

    #[tokio::test]
    async fn test_head_keeps_length_without_body() {
        let (_dir, forwarder) = fixture();
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/rest/icon/Person-Node")
            .body(())
            .unwrap();
        let resp = forwarder.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "13");
        assert!(resp.headers().contains_key(ETAG));
        assert!(body_of(resp).await.is_empty());

        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/rest/icon/Vehicle")
            .body(())
            .unwrap();
        let resp = forwarder.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_icon_is_404() {
        let (_dir, forwarder) = fixture();
        let resp = forwarder.call(get("/rest/icon/Vehicle")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let value: serde_json::Value = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(value["type"], "Vehicle");
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let (_dir, forwarder) = fixture();
        let first = forwarder.call(get("/rest/icon/personnode")).await.unwrap();
        let etag = first.headers()[ETAG].clone();

        let req = Request::builder()
            .uri("/rest/icon/personnode")
            .header(IF_NONE_MATCH, etag)
            .body(())
            .unwrap();
        let second = forwarder.call(req).await.unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_index_and_unknown_routes() {
        let (_dir, forwarder) = fixture();
        let index = forwarder.call(get("/rest")).await.unwrap();
        assert_eq!(index.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body_of(index).await).unwrap();
        assert_eq!(value["resources"][0], "icon");
        assert_eq!(value["server"], "test");

        let unknown = forwarder.call(get("/rest/nothing/here")).await.unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let (_dir, forwarder) = fixture();
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/rest/icon/personnode")
            .body(())
            .unwrap();
        let resp = forwarder.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_read_failure_propagates_as_error() {
        let app = RestApplication::new(Arc::new(BrokenHandler));
        let forwarder = Forwarder::new(app, HostContext::new("/rest", "test"));
        let err = forwarder.call(get("/rest/icon/person")).await.unwrap_err();
        assert!(matches!(err, RestError::Read { ref type_name, .. } if type_name == "person"));
    }
}
