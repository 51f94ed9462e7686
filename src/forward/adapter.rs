//! Adapter between the hosting server and a request-handling application

use hyper::service::Service;
use hyper::Request;
use std::sync::Arc;

/// What the hosting server knows about where the application is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    /// Normalized mount point, e.g. `/rest`
    pub mount_path: String,
    pub server_name: String,
}

impl HostContext {
    pub fn new(mount_path: impl Into<String>, server_name: impl Into<String>) -> Self {
        Self {
            mount_path: mount_path.into(),
            server_name: server_name.into(),
        }
    }

    /// `path` relative to the mount point, or `None` when it lies outside it
    ///
    /// The mount point itself maps to `/`.
    pub fn relative_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.mount_path == "/" {
            return Some(path);
        }
        match path.strip_prefix(self.mount_path.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

/// Hands requests to `next` with the [`HostContext`] attached as an extension.
///
/// Method, URI, headers and body pass through untouched.
#[derive(Debug)]
pub struct Adapter<A> {
    context: HostContext,
    next: Arc<A>,
}

impl<A> Adapter<A> {
    pub const fn new(context: HostContext, next: Arc<A>) -> Self {
        Self { context, next }
    }
}

impl<A, B> Service<Request<B>> for Adapter<A>
where
    A: Service<Request<B>>,
{
    type Response = A::Response;
    type Error = A::Error;
    type Future = A::Future;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.context.clone());
        self.next.call(req)
    }
}
