//! Minimal tsu-chain example: one chain, two handlers, in-process requests.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Logs are printed at DEBUG and above.
//!
//! The chain is built once at startup (trace → request id → auth). The
//! admin handler adds an extra call-site check that runs after the chain.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use http::StatusCode;
use tsu_chain::middleware::{self, Chain, Middleware};
use tsu_chain::{BoxedHandler, Request, Response};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut chain = Chain::new([middleware::trace()]);
    chain.add([request_id(), auth()]);

    let get_user = chain.wrap(get_user);
    let delete_user = chain.wrap_with(delete_user, [admin_only()]);

    let calls = [
        (&get_user, request("GET", "/users/42", Some("token"), false)),
        (&get_user, request("GET", "/users/42", None, false)),
        (&delete_user, request("DELETE", "/users/42", Some("token"), false)),
        (&delete_user, request("DELETE", "/users/42", Some("token"), true)),
    ];

    for (handler, req) in calls {
        let res = handler.call(req).await;
        println!(
            "{} request-id={} body={}",
            res.status_code(),
            res.header("x-request-id").unwrap_or("-"),
            String::from_utf8_lossy(res.body()),
        );
    }
}

// Assigns an id on the way in and echoes it on the way out.
fn request_id() -> Middleware {
    Middleware::from_fn(|mut req: Request, next: BoxedHandler| async move {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed).to_string();
        if req.set_header("x-request-id", &id).is_err() {
            return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
        }

        let mut res = next.call(req).await;
        if res.set_header("x-request-id", &id).is_err() {
            return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
        }
        res
    })
    .named("request_id")
}

fn auth() -> Middleware {
    Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
        match req.header("authorization") {
            Some(_) => next.call(req).await,
            None => Response::status(StatusCode::UNAUTHORIZED),
        }
    })
    .named("auth")
}

fn admin_only() -> Middleware {
    Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
        if req.header("x-admin").is_some() {
            next.call(req).await
        } else {
            Response::status(StatusCode::FORBIDDEN)
        }
    })
    .named("admin_only")
}

async fn get_user(req: Request) -> Response {
    let id = req.path().trim_start_matches("/users/");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}

async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

fn request(method: &str, path: &str, token: Option<&str>, admin: bool) -> Request {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    if admin {
        builder = builder.header("x-admin", "1");
    }
    builder
        .body(Bytes::new())
        .expect("valid request")
        .into()
}
