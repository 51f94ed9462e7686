//! Request handler module
//!
//! The hosting side of the server: decides which requests reach the
//! forwarder and answers the rest itself.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
