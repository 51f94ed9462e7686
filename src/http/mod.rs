//! HTTP protocol layer module
//!
//! Conditional requests and response builders shared by the host and the
//! REST application.

pub mod cache;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_health_response, build_icon_response, build_json_response,
};
