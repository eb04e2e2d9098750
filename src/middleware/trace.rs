//! Per-request tracing middleware.
//!
//! Opens a `request` span with the method and path, runs every inner layer
//! inside it, then emits one event with the response status and latency.
//! Requests and responses pass through untouched.
//!
//! ```rust
//! use std::time::Duration;
//! use tracing::Level;
//! use tsu_chain::middleware::{Chain, Trace};
//!
//! let chain = Chain::new([Trace::new()
//!     .level(Level::DEBUG)
//!     .slow_threshold(Duration::from_millis(250))
//!     .into_middleware()]);
//! # let _ = chain;
//! ```
//!
//! Register it first so its span covers every other middleware.

use std::time::Duration;

use http::StatusCode;
use tokio::time::Instant;
use tracing::{Instrument, Level, Span};

use super::Middleware;
use crate::handler::BoxedHandler;
use crate::request::Request;

/// Configuration for the tracing middleware.
#[derive(Clone, Copy, Debug)]
pub struct Trace {
    level: Level,
    slow_threshold: Option<Duration>,
}

impl Trace {
    /// `INFO` level, no slow-request threshold.
    pub fn new() -> Self {
        Self { level: Level::INFO, slow_threshold: None }
    }

    /// Level of the span and of the completion event.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Requests taking at least `threshold` are reported at `WARN` instead.
    #[must_use]
    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    pub fn into_middleware(self) -> Middleware {
        Middleware::from_fn(move |req: Request, next: BoxedHandler| {
            let span = self.span(&req);
            async move {
                let start = Instant::now();
                let res = next.call(req).await;
                self.record(res.status_code(), start.elapsed());
                res
            }
            .instrument(span)
        })
        .named("trace")
    }

    fn span(&self, req: &Request) -> Span {
        macro_rules! request_span {
            ($level:expr) => {
                tracing::span!($level, "request", method = %req.method(), path = %req.path())
            };
        }

        match self.level {
            Level::ERROR => request_span!(Level::ERROR),
            Level::WARN => request_span!(Level::WARN),
            Level::INFO => request_span!(Level::INFO),
            Level::DEBUG => request_span!(Level::DEBUG),
            _ => request_span!(Level::TRACE),
        }
    }

    fn record(&self, status: StatusCode, latency: Duration) {
        let status = status.as_u16();
        let latency_ms = latency.as_secs_f64() * 1000.0;

        if self.slow_threshold.is_some_and(|threshold| latency >= threshold) {
            tracing::warn!(status, latency_ms, "slow request");
            return;
        }

        macro_rules! completed {
            ($level:expr) => {
                tracing::event!($level, status, latency_ms, "request completed")
            };
        }

        match self.level {
            Level::ERROR => completed!(Level::ERROR),
            Level::WARN => completed!(Level::WARN),
            Level::INFO => completed!(Level::INFO),
            Level::DEBUG => completed!(Level::DEBUG),
            _ => completed!(Level::TRACE),
        }
    }
}

impl Default for Trace {
    fn default() -> Self { Self::new() }
}

impl From<Trace> for Middleware {
    fn from(trace: Trace) -> Self {
        trace.into_middleware()
    }
}

/// The tracing middleware with its default configuration.
pub fn trace() -> Middleware {
    Trace::new().into_middleware()
}
