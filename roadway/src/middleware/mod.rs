//! Defines types for `Middleware`, a reusable unit of logic that can apply to a group of requests
//! by being attached to the router, a group or a single route.

use std::pin::Pin;

use crate::handler::HandlerFuture;
use crate::state::State;

pub mod chain;

pub use self::chain::MiddlewareChain;

/// The remainder of the chain, handed to each `Middleware` in turn. Calling it passes control to
/// the next middleware, or to the routed handler once the chain is exhausted.
pub type Next = Box<dyn FnOnce(State) -> Pin<Box<HandlerFuture>> + Send>;

/// `Middleware` has the opportunity to provide additional behaviour to the `Request` / `Response`
/// interaction. For example:
///
/// * The request can be halted due to some unmet precondition;
/// * Middleware-specific state data can be recorded in the `State` struct for use elsewhere;
/// * The returned future can be manipulated via continuations to provide additional behaviour
///   after the request completes.
///
/// Middleware attached to the router wraps every request, fallbacks included. Middleware attached
/// to a group wraps every route in that group, and runs inside any middleware of the groups which
/// enclose it.
///
/// # Examples
///
/// Recording a piece of state data before passing the request through:
///
/// ```rust
/// use std::pin::Pin;
///
/// use hyper::{Body, Response, StatusCode};
/// use roadway::handler::HandlerFuture;
/// use roadway::helpers::http::response::create_response;
/// use roadway::middleware::{Middleware, Next};
/// use roadway::router::builder::*;
/// use roadway::state::{FromState, State};
///
/// struct Tenant(&'static str);
///
/// struct TenantMiddleware;
///
/// impl Middleware for TenantMiddleware {
///     fn call(&self, mut state: State, next: Next) -> Pin<Box<HandlerFuture>> {
///         state.put(Tenant("acme"));
///         next(state)
///     }
/// }
///
/// fn whoami(state: State) -> (State, Response<Body>) {
///     let tenant = Tenant::borrow_from(&state).0;
///     let res = create_response(&state, StatusCode::OK, mime::TEXT_PLAIN, tenant);
///     (state, res)
/// }
///
/// fn main() {
///     build_router(|route| {
///         route.with_middleware(TenantMiddleware);
///         route.get("/whoami").to(whoami);
///     });
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Entry point to the middleware. To pass the request on to the application, the middleware
    /// invokes `next` with the `State`. To halt processing, it returns a future of its own without
    /// calling `next`.
    fn call(&self, state: State, next: Next) -> Pin<Box<HandlerFuture>>;
}

impl<F> Middleware for F
where
    F: Fn(State, Next) -> Pin<Box<HandlerFuture>> + Send + Sync,
{
    fn call(&self, state: State, next: Next) -> Pin<Box<HandlerFuture>> {
        self(state, next)
    }
}
