// Connection handling module
// Admits a TCP connection and serves it over HTTP/1.1 in its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::handler;
use crate::logger;

/// Accept a connection unless `performance.max_connections` is reached.
///
/// Returns whether the connection was admitted.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
) -> bool {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            return false;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_debug(&format!("Could not set TCP_NODELAY for {peer_addr}: {e}"));
    }

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
    true
}

/// Serve one connection with keep-alive and an overall timeout, then release its slot
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::{Forwarder, HostContext};
    use crate::icons::BasicTypeHandler;
    use crate::rest::RestApplication;

    fn state_with_limit(max_connections: Option<u64>) -> Arc<config::AppState> {
        let mut cfg = config::Config::load_from("does-not-exist-icon-server").unwrap();
        cfg.performance.max_connections = max_connections;
        let app = RestApplication::new(Arc::new(BasicTypeHandler::new("icons")));
        let forwarder = Forwarder::new(app, HostContext::new("/rest", "test"));
        Arc::new(config::AppState::new(cfg, forwarder))
    }

    async fn accepted_stream() -> (tokio::net::TcpStream, SocketAddr, tokio::net::TcpStream) {
        let listener =
            crate::server::create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let client = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();
        (stream, peer, client)
    }

    #[tokio::test]
    async fn test_rejects_over_connection_limit() {
        let state = state_with_limit(Some(1));
        let counter = Arc::new(AtomicUsize::new(1));
        let (stream, peer, _client) = accepted_stream().await;

        assert!(!accept_connection(stream, peer, &state, &counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_admits_under_connection_limit() {
        let state = state_with_limit(Some(2));
        let counter = Arc::new(AtomicUsize::new(1));
        let (stream, peer, client) = accepted_stream().await;

        assert!(accept_connection(stream, peer, &state, &counter));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        drop(client);
    }
}
