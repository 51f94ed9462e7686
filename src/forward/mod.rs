//! Request forwarding module
//!
//! A [`Forwarder`] sits at a mount point of the hosting server and passes
//! every request it receives to an application through an [`Adapter`].
//! It never inspects, rewrites or filters traffic, and application errors
//! come back to the caller exactly as the application produced them.

mod adapter;

pub use adapter::{Adapter, HostContext};

use crate::logger;
use hyper::service::Service;
use hyper::Request;
use std::sync::{Arc, OnceLock};

/// Forwards requests to an application fixed at construction.
///
/// The adapter is built once, either eagerly through [`Forwarder::init`] or
/// on the first request; concurrent callers all observe the same instance.
pub struct Forwarder<A> {
    app: Arc<A>,
    context: HostContext,
    adapter: OnceLock<Adapter<A>>,
}

impl<A> Forwarder<A> {
    pub fn new(app: A, context: HostContext) -> Self {
        Self {
            app: Arc::new(app),
            context,
            adapter: OnceLock::new(),
        }
    }

    /// Build the adapter if it does not exist yet and return it
    pub fn init(&self) -> &Adapter<A> {
        self.adapter.get_or_init(|| {
            logger::log_forwarder_initialized(&self.context.mount_path);
            Adapter::new(self.context.clone(), Arc::clone(&self.app))
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.adapter.get().is_some()
    }

    pub const fn context(&self) -> &HostContext {
        &self.context
    }

    #[cfg(test)]
    pub fn application(&self) -> &A {
        &self.app
    }

    /// Hand one request to the application
    pub fn service<B>(&self, req: Request<B>) -> A::Future
    where
        A: Service<Request<B>>,
    {
        self.init().call(req)
    }
}

impl<A, B> Service<Request<B>> for Forwarder<A>
where
    A: Service<Request<B>>,
{
    type Response = A::Response;
    type Error = A::Error;
    type Future = A::Future;

    fn call(&self, req: Request<B>) -> Self::Future {
        self.service(req)
    }
}
