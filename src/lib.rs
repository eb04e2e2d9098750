//! # tsu-chain
//!
//! Ordered, append-only middleware chains for async HTTP handlers.
//! Register cross-cutting behaviour once, apply it to every handler.
//!
//! ## The contract
//!
//! A [`Chain`](middleware::Chain) is a list of [`Middleware`], each a
//! handler-to-handler transform. Middleware is only ever appended. Wrapping
//! a handler applies the chain so that middleware runs in registration
//! order on the way in and in exact reverse on the way out. Handler-specific
//! middleware passed at the call site sits inside the chain.
//!
//! What tsu-chain intentionally leaves to others:
//!
//! - **Transport**: hyper, or whatever server you run. [`Response::into_inner`]
//!   hands back an `http::Response` it can send.
//! - **Routing**: wrap each handler, then register it with your router.
//!
//! ## Quick start
//!
//! ```rust
//! use tsu_chain::middleware::{self, Chain, Middleware};
//! use tsu_chain::{Request, Response};
//!
//! # async fn run(req: Request) {
//! let request_id = Middleware::from_fn(|mut req: Request, next| async move {
//!     req.set_header("x-request-id", "42").unwrap();
//!     next.call(req).await
//! });
//!
//! let mut chain = Chain::new([middleware::trace()]);
//! chain.add([request_id]);
//!
//! let get_user = chain.wrap(get_user);
//! let res = get_user.call(req).await;
//! # let _ = res;
//! # }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.header("x-request-id").unwrap_or("none");
//!     Response::json(format!(r#"{{"request_id":"{id}"}}"#))
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use middleware::Middleware;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
