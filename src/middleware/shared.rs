//! Copy-on-write chain for concurrent registration.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{Chain, Middleware};
use crate::handler::{BoxedHandler, Handler};

/// A [`Chain`] that accepts new middleware through a shared reference.
///
/// Every `add` builds a new chain and swaps it in under a short write lock;
/// wrapping clones the current `Arc<Chain>` under a read lock and composes
/// outside of it. A wrap therefore sees the chain either entirely before or
/// entirely after any given `add`, and handlers already produced keep the
/// middleware they were built with.
///
/// ```rust
/// use std::sync::Arc;
/// use tsu_chain::middleware::{self, SharedChain};
///
/// let chain = Arc::new(SharedChain::default());
/// let registrar = Arc::clone(&chain);
/// std::thread::spawn(move || registrar.add([middleware::trace()]))
///     .join()
///     .unwrap();
/// assert_eq!(chain.len(), 1);
/// ```
#[derive(Default)]
pub struct SharedChain {
    current: RwLock<Arc<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self { current: RwLock::new(Arc::new(chain)) }
    }

    /// Appends `middlewares` after everything already registered.
    pub fn add<I, M>(&self, middlewares: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        let added: Vec<Option<Middleware>> = middlewares.into_iter().map(Into::into).collect();
        if added.is_empty() {
            return;
        }

        let mut current = self.current.write();
        let mut next = Chain::clone(&current);
        next.add(added);
        *current = Arc::new(next);
        debug!(len = current.len(), "shared chain swapped");
    }

    /// The chain as it stands right now.
    pub fn snapshot(&self) -> Arc<Chain> {
        Arc::clone(&self.current.read())
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Wraps `handler` with the chain as of this call. See [`Chain::wrap`].
    pub fn wrap(&self, handler: impl Handler) -> BoxedHandler {
        self.snapshot().wrap(handler)
    }

    /// Wraps `handler` with `middlewares`, then with the chain as of this
    /// call. See [`Chain::wrap_with`].
    pub fn wrap_with<I, M>(&self, handler: impl Handler, middlewares: I) -> BoxedHandler
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        self.snapshot().wrap_with(handler, middlewares)
    }
}

impl fmt::Debug for SharedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedChain").field(&*self.snapshot()).finish()
    }
}

impl From<Chain> for SharedChain {
    fn from(chain: Chain) -> Self {
        Self::new(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &'static str) -> Middleware {
        Middleware::new(|next| next).named(name)
    }

    #[test]
    fn snapshot_is_not_affected_by_later_adds() {
        let shared = SharedChain::from(Chain::new([noop("a")]));
        let before = shared.snapshot();
        shared.add([noop("b")]);

        assert_eq!(before.len(), 1);
        assert_eq!(shared.len(), 2);
        let after = shared.snapshot();
        let names: Vec<_> = after.iter().map(|m| m.and_then(Middleware::name)).collect();
        assert_eq!(names, [Some("a"), Some("b")]);
    }

    #[test]
    fn debug_lists_current_entries() {
        let shared = SharedChain::from(Chain::new([Some(noop("a")), None]));
        assert_eq!(format!("{shared:?}"), "SharedChain([Some(Middleware(a)), None])");
    }

    #[test]
    fn empty_add_keeps_the_same_chain() {
        let shared = SharedChain::default();
        let before = shared.snapshot();
        shared.add(Vec::<Middleware>::new());
        assert!(Arc::ptr_eq(&before, &shared.snapshot()));
        assert!(shared.is_empty());
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        let shared = Arc::new(SharedChain::default());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        shared.add([noop("n"), noop("n")]);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(shared.len(), 400);
    }
}
