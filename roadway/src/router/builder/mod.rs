//! Defines a builder API for constructing a `Router`.

mod draw;
mod single;

use std::sync::Arc;

use hyper::{Method, StatusCode};
use log::trace;

use crate::handler::{Handler, NewHandler};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::router::fallback::Fallbacks;
use crate::router::group::Group;
use crate::router::route::dispatch::DispatcherImpl;
use crate::router::route::Route;
use crate::router::tree::prefix::Prefix;
use crate::router::Router;

pub use self::draw::DrawRoutes;
pub use self::single::DefineSingleRoute;

/// Builds a `Router` using the provided closure. Routes are defined using the `RouterBuilder`
/// value passed to the closure, and the `Router` is constructed before returning.
///
/// ```rust
/// # use hyper::{Body, Response, StatusCode};
/// # use roadway::helpers::http::response::create_empty_response;
/// # use roadway::router::Router;
/// # use roadway::router::builder::*;
/// # use roadway::state::State;
/// #
/// # fn my_handler(state: State) -> (State, Response<Body>) {
/// #   let res = create_empty_response(&state, StatusCode::ACCEPTED);
/// #   (state, res)
/// # }
/// #
/// # fn not_found(state: State) -> (State, Response<Body>) {
/// #   let res = create_empty_response(&state, StatusCode::NOT_FOUND);
/// #   (state, res)
/// # }
/// #
/// fn router() -> Router {
///     build_router(|route| {
///         route.not_found(not_found);
///         route.get("/request/path").to(my_handler);
///     })
/// }
/// #
/// # fn main() { router(); }
/// ```
pub fn build_router<F>(f: F) -> Router
where
    F: FnOnce(&mut RouterBuilder),
{
    let mut builder = RouterBuilder {
        groups: Vec::new(),
        routes: Vec::new(),
        middleware: MiddlewareChain::new(),
        fallbacks: Fallbacks::new(),
    };

    f(&mut builder);

    let RouterBuilder {
        groups,
        routes,
        middleware,
        fallbacks,
    } = builder;

    trace!(
        " built router with {} groups and {} routes",
        groups.len(),
        routes.len()
    );
    Router::new(groups, routes, middleware, fallbacks)
}

/// The top-level builder which is created by `build_router` and passed to the provided closure.
/// See the `build_router` function and the `DrawRoutes` trait for usage.
pub struct RouterBuilder {
    groups: Vec<Group>,
    routes: Vec<Route>,
    middleware: MiddlewareChain,
    fallbacks: Fallbacks,
}

impl RouterBuilder {
    /// Adds middleware which wraps every request handled by the router, including those answered
    /// by a fallback. Middleware runs in the order it was added.
    pub fn with_middleware<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Sets the handler invoked when no group or route matches the request path.
    pub fn not_found<H>(&mut self, handler: H) -> &mut Self
    where
        H: Handler + Copy + Send + Sync + 'static,
    {
        self.fallback(StatusCode::NOT_FOUND, move || Ok(handler))
    }

    /// Sets the handler invoked when a group or route matches the request path, but none of the
    /// matching ones allow the request method.
    pub fn method_not_allowed<H>(&mut self, handler: H) -> &mut Self
    where
        H: Handler + Copy + Send + Sync + 'static,
    {
        self.fallback(StatusCode::METHOD_NOT_ALLOWED, move || Ok(handler))
    }

    fn fallback<NH>(&mut self, status: StatusCode, new_handler: NH) -> &mut Self
    where
        NH: NewHandler + 'static,
        NH::Instance: Send + 'static,
    {
        self.fallbacks
            .insert(status, Arc::new(DispatcherImpl::new(new_handler)));
        self
    }
}

impl DrawRoutes for RouterBuilder {
    fn component_refs(&mut self) -> (Option<&Prefix>, &mut Vec<Route>, &mut Vec<Group>) {
        (None, &mut self.routes, &mut self.groups)
    }
}

/// A builder for routes and nested groups sharing a path prefix. This is created by
/// `DrawRoutes::group` and passed to the provided closure.
pub struct GroupBuilder {
    prefix: Prefix,
    methods: Vec<Method>,
    routes: Vec<Route>,
    groups: Vec<Group>,
    middleware: MiddlewareChain,
}

impl GroupBuilder {
    fn new(prefix: Prefix) -> GroupBuilder {
        GroupBuilder {
            prefix,
            methods: Vec::new(),
            routes: Vec::new(),
            groups: Vec::new(),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Restricts the group to the given methods. Requests with any other method are refused
    /// before the routes of the group are considered.
    pub fn methods(&mut self, methods: &[Method]) -> &mut Self {
        self.methods = methods.to_vec();
        self
    }

    /// Adds middleware which wraps every route of the group and of its nested groups. It runs
    /// after the middleware of enclosing groups and before the middleware of the route.
    pub fn with_middleware<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    fn finalize(self) -> Group {
        let GroupBuilder {
            prefix,
            methods,
            routes,
            groups,
            middleware,
        } = self;

        trace!(
            " finalizing group `{}` with {} groups and {} routes",
            prefix.path(),
            groups.len(),
            routes.len()
        );

        let mut group = Group::new(prefix, methods, routes, groups);
        if !middleware.is_empty() {
            group.wrap(&middleware);
        }
        group
    }
}

impl DrawRoutes for GroupBuilder {
    fn component_refs(&mut self) -> (Option<&Prefix>, &mut Vec<Route>, &mut Vec<Group>) {
        (Some(&self.prefix), &mut self.routes, &mut self.groups)
    }
}

/// Implements the methods required for associating a single route with a `Handler`. This type
/// is created by the methods of `DrawRoutes`, and the route is only registered once a handler is
/// given to it through `DefineSingleRoute`.
pub struct SingleRouteBuilder<'a> {
    routes: &'a mut Vec<Route>,
    prefix: Prefix,
    under_group: bool,
    methods: Vec<Method>,
    middleware: MiddlewareChain,
}

impl<'a> SingleRouteBuilder<'a> {
    /// Replaces the methods this route serves. An empty list serves every method.
    pub fn methods(mut self, methods: &[Method]) -> Self {
        self.methods = methods.to_vec();
        self
    }

    /// Adds middleware which wraps only this route. It runs after the middleware of the router
    /// and of every enclosing group.
    pub fn with_middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    fn finish<NH>(self, new_handler: NH)
    where
        NH: NewHandler + 'static,
        NH::Instance: Send + 'static,
    {
        trace!(
            " adding route `{}` for methods {:?}",
            self.prefix.path(),
            self.methods
        );

        let route = Route::new(
            self.prefix,
            self.methods,
            self.under_group,
            Arc::new(DispatcherImpl::new(new_handler)),
            self.middleware,
        );
        self.routes.push(route);
    }
}
