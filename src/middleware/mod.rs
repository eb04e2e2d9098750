//! Middleware layer.
//!
//! Middleware is the right place for cross-cutting concerns: structured
//! tracing, metrics, request-id injection and authentication-header
//! inspection. A [`Middleware`] is a decorator: it receives the next handler
//! and returns a new handler that runs its own logic around it.
//!
//! Middleware is registered once on a [`Chain`] and then applied, in
//! registration order, to as many handlers as needed:
//!
//! ```rust
//! use tsu_chain::middleware::{self, Chain, Middleware};
//! use tsu_chain::{Request, Response};
//!
//! let auth = Middleware::from_fn(|req: Request, next| async move {
//!     match req.header("authorization") {
//!         Some(_) => next.call(req).await,
//!         None => Response::status(http::StatusCode::UNAUTHORIZED),
//!     }
//! });
//!
//! let mut chain = Chain::new([middleware::trace()]);
//! chain.add([auth]);
//!
//! let get_user = chain.wrap(|_req: Request| async { "alice" });
//! # let _ = get_user;
//! ```
//!
//! Built-in middleware:
//! - [`trace()`]: per-request span with method, path, status, latency

mod chain;
mod shared;
pub mod trace;

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::IntoResponse;

pub use chain::Chain;
pub use shared::SharedChain;
pub use trace::{Trace, trace};

type WrapFn = dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static;

/// A handler-to-handler transform.
///
/// Cheap to clone: clones share the same transform. A middleware holds no
/// per-request state of its own; the handler it returns may capture
/// whatever the request needs.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<WrapFn>,
    name: Option<Cow<'static, str>>,
}

impl Middleware {
    /// Builds a middleware from a raw transform.
    ///
    /// ```rust
    /// use tsu_chain::middleware::Middleware;
    /// use tsu_chain::{BoxedHandler, Request};
    ///
    /// let tag = Middleware::new(|next: BoxedHandler| {
    ///     BoxedHandler::new(move |mut req: Request| {
    ///         let next = next.clone();
    ///         async move {
    ///             req.set_header("x-tagged", "1").unwrap();
    ///             next.call(req).await
    ///         }
    ///     })
    /// });
    /// # let _ = tag;
    /// ```
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        Self { wrap: Arc::new(wrap), name: None }
    }

    /// Builds an around-style middleware from an async function that gets
    /// the request and the next handler.
    ///
    /// Code before `next.call(req).await` runs on the way in, code after it
    /// runs on the way out. Not calling `next` short-circuits every inner
    /// layer.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, BoxedHandler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(move |next: BoxedHandler| {
            let f = Arc::clone(&f);
            BoxedHandler::new(move |req: Request| (*f)(req, next.clone()))
        })
    }

    /// Attaches a label shown in `Debug` output and debug logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Wraps `next` with this middleware alone.
    pub fn apply(&self, next: BoxedHandler) -> BoxedHandler {
        (self.wrap)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Middleware({name})"),
            None => f.write_str("Middleware(<anonymous>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    use crate::response::Response;

    fn request() -> Request {
        http::Request::get("/").body(Bytes::new()).unwrap().into()
    }

    #[tokio::test]
    async fn from_fn_can_short_circuit() {
        let deny = Middleware::from_fn(|_req: Request, _next: BoxedHandler| async {
            StatusCode::FORBIDDEN
        });
        let handler = deny.apply(BoxedHandler::new(|_req: Request| async { "reached" }));
        let res = handler.call(request()).await;
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn from_fn_sees_response_on_the_way_out() {
        let stamp = Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
            let mut res: Response = next.call(req).await;
            res.set_header("x-stamped", "yes").unwrap();
            res
        });
        let handler = stamp.apply(BoxedHandler::new(|_req: Request| async { "ok" }));
        let res = handler.call(request()).await;
        assert_eq!(res.header("x-stamped"), Some("yes"));
        assert_eq!(res.body(), b"ok");
    }

    #[test]
    fn debug_shows_name() {
        let mw = Middleware::new(|next| next).named("noop");
        assert_eq!(mw.name(), Some("noop"));
        assert_eq!(format!("{mw:?}"), "Middleware(noop)");
        assert_eq!(format!("{:?}", Middleware::new(|next| next)), "Middleware(<anonymous>)");
    }
}
