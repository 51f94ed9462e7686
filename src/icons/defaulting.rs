//! Composing handler that substitutes a default type on a miss

use super::{Attributes, IconStream, TypeHandler};
use crate::logger;

/// Asks `inner` for the requested type, then for `default_type` if that is absent.
pub struct DefaultingTypeHandler {
    inner: Box<dyn TypeHandler>,
    default_type: String,
}

impl DefaultingTypeHandler {
    pub fn new(inner: Box<dyn TypeHandler>, default_type: impl Into<String>) -> Self {
        Self {
            inner,
            default_type: default_type.into(),
        }
    }
}

impl TypeHandler for DefaultingTypeHandler {
    fn get_stream(&self, type_name: &str, attributes: &Attributes) -> Option<IconStream> {
        if let Some(stream) = self.inner.get_stream(type_name, attributes) {
            return Some(stream);
        }
        logger::log_debug(&format!(
            "[Icons] Substituting '{}' for '{type_name}'",
            self.default_type
        ));
        self.inner.get_stream(&self.default_type, attributes)
    }
}
