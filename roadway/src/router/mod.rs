//! Defines the `Router` and supporting types.

pub mod builder;
pub mod fallback;
pub mod group;
pub mod matcher;
pub mod non_match;
pub mod route;
pub mod tree;

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::{self, FutureExt, TryFutureExt};
use hyper::{Method, StatusCode};
use log::{error, trace};

use crate::handler::{Handler, HandlerFuture, IntoResponse, NewHandler};
use crate::helpers::http::request::path::RequestPathSegments;
use crate::helpers::http::response::create_empty_response;
use crate::middleware::MiddlewareChain;
use crate::router::fallback::Fallbacks;
use crate::router::group::Group;
use crate::router::matcher::{Match, RouteMatcher};
use crate::router::non_match::RouteNonMatch;
use crate::router::route::Route;
use crate::router::tree::segment::SegmentMapping;
use crate::state::{request_id, FromState, State};

/// The path variables bound while routing the current request, stored in `State` by the
/// `Router`.
///
/// Only present when at least one variable was bound. Use `vars` to read them.
#[derive(Clone, Debug, PartialEq)]
pub struct PathVars {
    vars: HashMap<String, String>,
}

impl PathVars {
    /// The value bound to the variable `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// All bound variables.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.vars
    }
}

/// Returns the path variables bound for the current request, or `None` when the matched group
/// and route patterns held no variables.
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::helpers::http::response::create_response;
/// use roadway::router::vars;
/// use roadway::state::State;
///
/// fn greet(state: State) -> (State, Response<Body>) {
///     let who = vars(&state)
///         .and_then(|vars| vars.get("who"))
///         .cloned()
///         .unwrap_or_else(|| "stranger".to_owned());
///
///     let res = create_response(&state, StatusCode::OK, mime::TEXT_PLAIN, format!("Hello, {}!", who));
///     (state, res)
/// }
/// #
/// # fn main() {
/// #     use roadway::router::builder::*;
/// #     build_router(|route| route.get("/hello/{who}").to(greet));
/// # }
/// ```
pub fn vars(state: &State) -> Option<&HashMap<String, String>> {
    PathVars::try_borrow_from(state).map(PathVars::as_map)
}

struct RouterData {
    groups: Vec<Group>,
    routes: Vec<Route>,
    middleware: MiddlewareChain,
    fallbacks: Fallbacks,
}

/// Responsible for dispatching requests to a linked `Route`, and for dispatching to the
/// configured fallbacks when no `Route` serves the request.
///
/// Groups are resolved first, descending into the nested groups of each winner; the routes of the
/// innermost winning group are then resolved. When no group wins, the routes registered at the
/// root are resolved instead, and a `405 Method Not Allowed` from the groups is kept over a
/// `404 Not Found` from the routes.
///
/// A `Router` is immutable once built, and cheap to clone.
///
/// # Examples
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::helpers::http::response::create_empty_response;
/// use roadway::router::builder::*;
/// use roadway::state::State;
///
/// fn handler(state: State) -> (State, Response<Body>) {
///     let res = create_empty_response(&state, StatusCode::OK);
///     (state, res)
/// }
///
/// let router = build_router(|route| {
///     route.get("/").to(handler);
///     route.group("/api", |group| {
///         group.get("/users/{id}").to(handler);
///     });
/// });
///
/// assert_eq!(router.routes().len(), 1);
/// assert_eq!(router.groups().len(), 1);
/// ```
#[derive(Clone)]
pub struct Router {
    data: Arc<RouterData>,
}

impl NewHandler for Router {
    type Instance = Router;

    // Creates a new Router instance to route new HTTP requests
    fn new_handler(&self) -> anyhow::Result<Self::Instance> {
        trace!(" cloning instance");
        Ok(self.clone())
    }
}

impl Handler for Router {
    /// Handles the request by resolving the `Route` which serves it, storing any path variables in
    /// `State` and dispatching to the associated `Handler`.
    fn handle(self, state: State) -> Pin<Box<HandlerFuture>> {
        trace!("[{}] starting", request_id(&state));

        let data = Arc::clone(&self.data);
        let f = self
            .data
            .middleware
            .call(state, move |state| data.dispatch(state));

        Router::finalize_response(f)
    }
}

impl Router {
    pub(crate) fn new(
        groups: Vec<Group>,
        routes: Vec<Route>,
        middleware: MiddlewareChain,
        fallbacks: Fallbacks,
    ) -> Router {
        Router {
            data: Arc::new(RouterData {
                groups,
                routes,
                middleware,
                fallbacks,
            }),
        }
    }

    /// The groups registered at the root, in registration order.
    pub fn groups(&self) -> &[Group] {
        &self.data.groups
    }

    /// The routes registered at the root, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.data.routes
    }

    fn finalize_response(f: Pin<Box<HandlerFuture>>) -> Pin<Box<HandlerFuture>> {
        f.or_else(|(state, err)| {
            trace!(
                "[{}] converting error into http response \
                 during finalization: {:?}",
                request_id(&state),
                err
            );
            let response = err.into_response(&state);
            future::ok((state, response))
        })
        .boxed()
    }
}

impl RouterData {
    fn dispatch(&self, mut state: State) -> Pin<Box<HandlerFuture>> {
        let outcome = {
            let method = Method::try_borrow_from(&state);
            let path = RequestPathSegments::try_borrow_from(&state);

            match (method, path) {
                (Some(method), Some(path)) => Some(self.resolve(&RouteMatcher::new(method, path))),
                _ => None,
            }
        };

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => {
                error!(
                    "[{}] request method or path segments missing from state",
                    request_id(&state)
                );
                let res = create_empty_response(&state, StatusCode::INTERNAL_SERVER_ERROR);
                return future::ok((state, res)).boxed();
            }
        };

        match outcome {
            Ok((route, bindings)) => {
                if !bindings.is_empty() {
                    trace!(
                        "[{}] storing {} path variables",
                        request_id(&state),
                        bindings.len()
                    );
                    state.put(PathVars { vars: bindings });
                }
                route.dispatch(state)
            }
            Err(non_match) => {
                trace!(
                    "[{}] no route found, responding with {}",
                    request_id(&state),
                    non_match.status()
                );
                self.fallbacks.respond(state, non_match)
            }
        }
    }

    fn resolve(&self, matcher: &RouteMatcher<'_>) -> Result<(&Route, SegmentMapping), RouteNonMatch> {
        match matcher.groups(&self.groups) {
            Ok(group) => resolve_within(matcher, group),
            Err(groups_non_match) => matcher
                .routes(&self.routes)
                .map(Match::into_parts)
                .map_err(|routes_non_match| groups_non_match.union(routes_non_match)),
        }
    }
}

/// Resolves the route serving a request inside a group which won, descending into its nested
/// groups first. Bindings of the group are merged with those of the nested winners.
fn resolve_within<'a>(
    matcher: &RouteMatcher<'_>,
    group: Match<'a, Group>,
) -> Result<(&'a Route, SegmentMapping), RouteNonMatch> {
    let (group, mut bindings) = group.into_parts();

    let (route, inner) = match matcher.groups(group.groups()) {
        Ok(nested) => resolve_within(matcher, nested)?,
        Err(nested_non_match) => matcher
            .routes(group.routes())
            .map(Match::into_parts)
            .map_err(|routes_non_match| nested_non_match.union(routes_non_match))?,
    };

    bindings.extend(inner);
    Ok((route, bindings))
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("groups", &self.data.groups)
            .field("routes", &self.data.routes)
            .field("middleware", &self.data.middleware)
            .field("fallbacks", &self.data.fallbacks)
            .finish()
    }
}
