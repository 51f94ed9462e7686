//! Conditional request support
//!
//! Icons are re-read on every request; `ETag`s only let clients skip the body.

use hyper::header::{HeaderMap, IF_NONE_MATCH};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` for `content`, e.g. `"3f2a9c"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// True when `If-None-Match` lists `etag` or `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client.split(',').map(str::trim).any(|e| e == etag || e == "*")
    })
}

/// [`check_etag_match`] against the request headers
pub fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    let if_none_match = headers.get(IF_NONE_MATCH).and_then(|v| v.to_str().ok());
    check_etag_match(if_none_match, etag)
}
