//! REST application errors

use thiserror::Error;

/// Failures while handling a request. Absent icons are not errors; they are
/// answered with a 404 by the application itself.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("failed to read icon for type '{type_name}': {source}")]
    Read {
        type_name: String,
        source: std::io::Error,
    },

    #[error("icon lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RestError>;
