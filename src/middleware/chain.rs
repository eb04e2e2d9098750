//! Ordered, append-only middleware chain.
//!
//! # Execution order
//!
//! Middleware runs in registration order on the way in and in reverse on
//! the way out. For a chain `[a, b]` wrapping `h` with call-site
//! middleware `[c]`:
//!
//! ```text
//! a → b → c → h → c → b → a
//! ```
//!
//! To get there each group is applied back to front: `c` wraps `h`, then
//! `b` wraps that, then `a` wraps everything, so the first registered
//! middleware ends up outermost.

use std::fmt;

use tracing::debug;

use super::Middleware;
use crate::handler::{BoxedHandler, Handler};

/// An ordered collection of middleware applied to handlers in registration
/// order.
///
/// Entries are only ever appended. `None` entries are kept in place (they
/// count towards [`len`](Chain::len)) and are skipped when wrapping.
///
/// `add` needs `&mut self` while `wrap` needs `&self`, so the usual pattern
/// is to build the chain during startup and share it read-only afterwards.
/// Use [`SharedChain`](super::SharedChain) when middleware must be added
/// while other threads are already wrapping handlers.
#[derive(Clone, Default)]
pub struct Chain {
    middlewares: Vec<Option<Middleware>>,
}

impl Chain {
    /// Creates a chain holding exactly `middlewares`, in order.
    ///
    /// Use [`Chain::default`] for an empty chain.
    pub fn new<I, M>(middlewares: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        Self { middlewares: middlewares.into_iter().map(Into::into).collect() }
    }

    /// Appends `middlewares` after everything already registered.
    pub fn add<I, M>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        let before = self.middlewares.len();
        self.middlewares.extend(middlewares.into_iter().map(Into::into));
        let len = self.middlewares.len();
        debug!(added = len - before, len, "middleware added to chain");
    }

    /// Builder form of [`add`](Chain::add). Returns `self` for chaining.
    #[must_use]
    pub fn with<I, M>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        self.add(middlewares);
        self
    }

    /// Number of registered entries, `None` entries included.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Registered entries in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&Middleware>> + '_ {
        self.middlewares.iter().map(Option::as_ref)
    }

    /// Wraps `handler` with every middleware in the chain.
    ///
    /// An empty chain returns a handler that behaves exactly like `handler`.
    pub fn wrap(&self, handler: impl Handler) -> BoxedHandler {
        let handler = apply_all(handler.into_boxed_handler(), &self.middlewares);
        debug!(chain = self.middlewares.len(), call_site = 0, "handler wrapped");
        handler
    }

    /// Wraps `handler` with handler-specific `middlewares` first, then with
    /// the chain.
    ///
    /// The call-site middleware sits inside the chain: on the way in it runs
    /// after every chain middleware, in the order given here.
    pub fn wrap_with<I, M>(&self, handler: impl Handler, middlewares: I) -> BoxedHandler
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        let call_site: Vec<Option<Middleware>> =
            middlewares.into_iter().map(Into::into).collect();
        let handler = apply_all(handler.into_boxed_handler(), &call_site);
        let handler = apply_all(handler, &self.middlewares);
        debug!(
            chain = self.middlewares.len(),
            call_site = call_site.len(),
            "handler wrapped"
        );
        handler
    }
}

/// Applies `middlewares` back to front so the first one ends up outermost.
fn apply_all(handler: BoxedHandler, middlewares: &[Option<Middleware>]) -> BoxedHandler {
    middlewares
        .iter()
        .rev()
        .flatten()
        .fold(handler, |next, middleware| middleware.apply(next))
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.middlewares).finish()
    }
}

impl<M> FromIterator<M> for Chain
where
    M: Into<Option<Middleware>>,
{
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<M> Extend<M> for Chain
where
    M: Into<Option<Middleware>>,
{
    fn extend<I: IntoIterator<Item = M>>(&mut self, iter: I) {
        self.add(iter);
    }
}
