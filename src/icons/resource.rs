//! Resource loading under a base directory
//!
//! Every lookup opens a fresh handle; nothing is cached.

use crate::logger;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Join `filename` onto `base_path`.
///
/// Only a single plain file name is accepted; anything that could walk out of
/// the base directory (separators, `.`, `..`, absolute paths) resolves to `None`.
pub fn resolve(base_path: &Path, filename: &str) -> Option<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(base_path.join(name)),
        _ => None,
    }
}

/// Open `filename` under `base_path`.
///
/// Missing files and directories are reported as `None`. Other failures are
/// logged and also reported as `None`.
pub fn get(base_path: &Path, filename: &str) -> Option<File> {
    let Some(path) = resolve(base_path, filename) else {
        logger::log_warning(&format!(
            "Rejected resource name '{filename}' under '{}'",
            base_path.display()
        ));
        return None;
    };

    let file = match File::open(&path) {
        Ok(f) => f,
        // Not found is the common case, no need to log at warning level
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open resource '{}': {e}",
                path.display()
            ));
            return None;
        }
    };

    match file.metadata() {
        Ok(meta) if meta.is_file() => Some(file),
        Ok(_) => None,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat resource '{}': {e}",
                path.display()
            ));
            None
        }
    }
}
