//! Single-attribute icon handler

use super::{resource, types, Attributes, IconStream, TypeHandler};
use crate::logger;
use std::path::PathBuf;

const SVG_SUFFIX: &str = ".svg";

/// Loads `<shortform(type)>.svg` from one directory. Attributes are ignored.
#[derive(Debug, Clone)]
pub struct BasicTypeHandler {
    base_path: PathBuf,
}

impl BasicTypeHandler {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    #[cfg(test)]
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// File name looked up for `type_name`, or `None` if it has no usable short form
    pub fn resource_name(type_name: &str) -> Option<String> {
        let stem = types::shortform(type_name);
        if stem.is_empty() {
            return None;
        }
        Some(stem + SVG_SUFFIX)
    }
}

impl TypeHandler for BasicTypeHandler {
    fn get_stream(&self, type_name: &str, _attributes: &Attributes) -> Option<IconStream> {
        let name = Self::resource_name(type_name)?;
        match resource::get(&self.base_path, &name) {
            Some(file) => Some(Box::new(file)),
            None => {
                logger::log_icon_miss(type_name, &name);
                None
            }
        }
    }
}
