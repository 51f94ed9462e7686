use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod forward;
mod handler;
mod http;
mod icons;
mod logger;
mod rest;
mod server;

use forward::{Forwarder, HostContext};
use rest::RestApplication;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Size the runtime from `server.workers`, defaulting to one thread per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("[CONFIG] Using {workers} worker threads"));
    } else {
        logger::log_info("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    if !Path::new(&cfg.icons.base_path).is_dir() {
        logger::log_warning(&format!(
            "Icon base path '{}' is not a directory; every icon lookup will miss",
            cfg.icons.base_path
        ));
    }

    let handler = icons::build_handler(&cfg.icons);
    let context = HostContext::new(cfg.rest.mount_path.clone(), cfg.http.server_name.clone());
    let forwarder = Forwarder::new(RestApplication::new(handler), context);
    // Build the adapter before the first connection can arrive
    forwarder.init();

    let state = Arc::new(config::AppState::new(cfg, forwarder));

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0)), shutdown).await;
    Ok(())
}
