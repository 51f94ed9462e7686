//! Icon resolution module
//!
//! Maps a logical type name to a readable SVG resource. Handlers share the
//! [`TypeHandler`] interface and are chosen from configuration.

mod basic;
mod defaulting;
pub mod resource;
pub mod types;

pub use basic::BasicTypeHandler;
pub use defaulting::DefaultingTypeHandler;

use crate::config::{HandlerKind, IconsConfig};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

/// Attribute name to value; handlers may ignore it
pub type Attributes = HashMap<String, String>;

/// Readable icon bytes, owned by the caller. Dropping it closes the handle.
pub type IconStream = Box<dyn Read + Send>;

/// Given a type and attributes, produce a stream.
///
/// Implementations may block on I/O. `None` means no resource exists for the
/// request; handlers never substitute silently unless that is their purpose.
pub trait TypeHandler: Send + Sync {
    fn get_stream(&self, type_name: &str, attributes: &Attributes) -> Option<IconStream>;
}

/// Build the handler variant named in configuration
pub fn build_handler(config: &IconsConfig) -> Arc<dyn TypeHandler> {
    let handler: Box<dyn TypeHandler> = match config.handler {
        HandlerKind::Basic => Box::new(BasicTypeHandler::new(&config.base_path)),
    };

    match &config.default_type {
        Some(default_type) => Arc::new(DefaultingTypeHandler::new(handler, default_type.clone())),
        None => Arc::from(handler),
    }
}
