// Application state module
// Everything a connection task needs, built once at startup

use crate::forward::Forwarder;
use crate::rest::RestApplication;

use super::types::Config;

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    /// Forwards everything under `rest.mount_path` to the REST application
    pub forwarder: Forwarder<RestApplication>,
}

impl AppState {
    pub fn new(config: Config, forwarder: Forwarder<RestApplication>) -> Self {
        Self { config, forwarder }
    }
}
