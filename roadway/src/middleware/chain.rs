//! Defines the type for connecting multiple middleware into a "chain" which wraps a handler.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use log::trace;

use crate::handler::HandlerFuture;
use crate::middleware::{Middleware, Next};
use crate::state::State;

/// An ordered list of `Middleware`, outermost first.
///
/// Chains are assembled while the router is built. Each route ends up owning the chain of every
/// group which encloses it followed by its own middleware, so no chain is walked more than once
/// per request.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Creates an empty chain, which passes requests straight through.
    pub fn new() -> Self {
        MiddlewareChain::default()
    }

    pub(crate) fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    /// Appends the middleware of `inner` so that it runs after the middleware already present.
    pub(crate) fn extend(&mut self, inner: &MiddlewareChain) {
        self.middleware.extend(inner.middleware.iter().cloned());
    }

    /// Number of middleware in the chain.
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// True when the chain holds no middleware.
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Runs the chain, with `f` as the innermost step.
    pub fn call<F>(&self, state: State, f: F) -> Pin<Box<HandlerFuture>>
    where
        F: FnOnce(State) -> Pin<Box<HandlerFuture>> + Send + 'static,
    {
        trace!(" invoking middleware chain of {} middleware", self.len());

        let next = self
            .middleware
            .iter()
            .rev()
            .fold(Box::new(f) as Next, |next, middleware| {
                let middleware = Arc::clone(middleware);
                Box::new(move |state| middleware.call(state, next))
            });

        next(state)
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.middleware.len())
            .finish()
    }
}
