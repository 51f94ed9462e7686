// Configuration module entry point
// Loads the layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HandlerKind, IconsConfig};

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

/// Prefix of environment overrides, e.g. `ICON_SERVER__SERVER__PORT`
const ENV_PREFIX: &str = "ICON_SERVER";

impl Config {
    /// Load configuration using the first command line argument as the file path
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    /// Missing files are allowed; defaults and `ICON_SERVER__*` variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(config_path, environment())
    }

    /// File first, then `env` on top of it, then defaults for anything still unset
    fn load_layered(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "icon-server")?
            .set_default("icons.base_path", "icons")?
            .set_default("icons.handler", "basic")?
            .set_default("rest.mount_path", "/rest")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.rest.mount_path = normalize_mount_path(&cfg.rest.mount_path);
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Mount paths always start with `/` and never end with one (except the root itself)
fn normalize_mount_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}
