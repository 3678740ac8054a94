//! Defines `Route`, the terminal entity of the router which dispatches a request to a handler.
//!
//! The `Router` compares the request path with the `Route` instances of the winning group (or of
//! the root) in registration order. The request is dispatched to the first `Route` whose path
//! matches exactly and whose allowed methods include the request method.

pub mod dispatch;

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use hyper::Method;
use log::trace;

use crate::handler::HandlerFuture;
use crate::middleware::MiddlewareChain;
use crate::router::route::dispatch::Dispatcher;
use crate::router::tree::prefix::Prefix;
use crate::state::{request_id, State};

/// A registered path, the methods it serves and the handler it dispatches to.
pub struct Route {
    prefix: Prefix,
    methods: Vec<Method>,
    under_group: bool,
    dispatcher: Arc<dyn Dispatcher>,
    middleware: MiddlewareChain,
}

impl Route {
    /// Creates a new `Route`. An empty `methods` list allows every method.
    pub(crate) fn new(
        prefix: Prefix,
        methods: Vec<Method>,
        under_group: bool,
        dispatcher: Arc<dyn Dispatcher>,
        middleware: MiddlewareChain,
    ) -> Route {
        Route {
            prefix,
            methods,
            under_group,
            dispatcher,
            middleware,
        }
    }

    /// The path of this route, relative to its group.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// The methods this route serves. Empty when it serves every method.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// True when this route was registered inside a group, so that the group's segments are
    /// stripped from the request path before comparison.
    pub fn is_under_group(&self) -> bool {
        self.under_group
    }

    /// Places the middleware of an enclosing group outside this route's own middleware.
    pub(crate) fn wrap(&mut self, outer: &MiddlewareChain) {
        let mut middleware = outer.clone();
        middleware.extend(&self.middleware);
        self.middleware = middleware;
    }

    /// Dispatches the request through this route's middleware to its handler.
    pub(crate) fn dispatch(&self, state: State) -> Pin<Box<HandlerFuture>> {
        trace!(
            "[{}] dispatching to route `{}`",
            request_id(&state),
            self.prefix.path()
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        self.middleware
            .call(state, move |state| dispatcher.dispatch(state))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.prefix.path())
            .field("methods", &self.methods)
            .field("under_group", &self.under_group)
            .field("middleware", &self.middleware)
            .finish()
    }
}
