//! Defines `RouteMatcher`, which resolves the group or route serving a request.

use hyper::{Method, StatusCode};
use log::trace;

use crate::helpers::http::request::path::RequestPathSegments;
use crate::router::group::Group;
use crate::router::non_match::RouteNonMatch;
use crate::router::route::Route;
use crate::router::tree::prefix::Prefix;
use crate::router::tree::segment::SegmentMapping;
use crate::router::tree::{match_pieces, MatchMode};

/// An entity the `RouteMatcher` can select: a `Group` or a `Route`.
pub trait Routable {
    /// How much of the request path the entity's pattern must cover.
    const MODE: MatchMode;

    /// The registered path of the entity.
    fn prefix(&self) -> &Prefix;

    /// The methods the entity allows. Empty when it allows every method.
    fn methods(&self) -> &[Method];

    /// The part of the full request path the entity's pattern is compared with.
    fn working_segments<'r>(&self, full: &'r [String]) -> &'r [String];

    /// Determines if the entity allows `method`.
    fn allows(&self, method: &Method) -> bool {
        self.methods().is_empty() || self.methods().contains(method)
    }
}

impl Routable for Group {
    const MODE: MatchMode = MatchMode::Prefix;

    fn prefix(&self) -> &Prefix {
        Group::prefix(self)
    }

    fn methods(&self) -> &[Method] {
        Group::methods(self)
    }

    fn working_segments<'r>(&self, full: &'r [String]) -> &'r [String] {
        self.prefix().excluded(full)
    }
}

impl Routable for Route {
    const MODE: MatchMode = MatchMode::Exact;

    fn prefix(&self) -> &Prefix {
        Route::prefix(self)
    }

    fn methods(&self) -> &[Method] {
        Route::methods(self)
    }

    fn working_segments<'r>(&self, full: &'r [String]) -> &'r [String] {
        if self.is_under_group() {
            self.prefix().excluded(full)
        } else {
            full
        }
    }
}

/// A selected entity, with the variables its pattern bound.
#[derive(Debug)]
pub struct Match<'a, T> {
    entity: &'a T,
    bindings: SegmentMapping,
}

impl<'a, T> Match<'a, T> {
    /// The selected entity.
    pub fn entity(&self) -> &'a T {
        self.entity
    }

    /// Variables bound by the entity's pattern.
    pub fn bindings(&self) -> &SegmentMapping {
        &self.bindings
    }

    /// Splits the match into the entity and its bindings.
    pub fn into_parts(self) -> (&'a T, SegmentMapping) {
        (self.entity, self.bindings)
    }
}

/// Resolves groups and routes for a single request.
///
/// Candidates are visited in registration order and each one is compared with the request path
/// independently, after stripping the segments of its enclosing groups from the full path. The
/// first candidate matching both path and method wins. A candidate matching the path but not the
/// method records `405 Method Not Allowed`, which a later winner overrides and a later path
/// mismatch never downgrades to `404 Not Found`.
///
/// ```rust
/// use hyper::Method;
/// use roadway::helpers::http::request::path::RequestPathSegments;
/// use roadway::router::builder::*;
/// use roadway::router::matcher::{match_status, RouteMatcher};
/// # use roadway::state::State;
/// # use hyper::{Body, Response, StatusCode};
/// # use roadway::helpers::http::response::create_empty_response;
/// # fn handler(state: State) -> (State, Response<Body>) {
/// #     let res = create_empty_response(&state, StatusCode::OK);
/// #     (state, res)
/// # }
///
/// let router = build_router(|route| {
///     route.get("/london/is/the/capital").to(handler);
///     route.delete("/london/is/the/capital").to(handler);
/// });
///
/// let path = RequestPathSegments::new("/london//is/the/capital/");
///
/// let get = RouteMatcher::new(&Method::GET, &path).routes(router.routes());
/// assert_eq!(match_status(&get), 0);
///
/// let post = RouteMatcher::new(&Method::POST, &path).routes(router.routes());
/// assert_eq!(match_status(&post), 405);
/// ```
pub struct RouteMatcher<'r> {
    method: &'r Method,
    path: &'r RequestPathSegments,
}

impl<'r> RouteMatcher<'r> {
    /// Creates a `RouteMatcher` for the request `method` and normalized `path`.
    pub fn new(method: &'r Method, path: &'r RequestPathSegments) -> RouteMatcher<'r> {
        RouteMatcher { method, path }
    }

    /// Selects the first group whose pattern prefixes the request path and which allows the
    /// request method.
    pub fn groups<'a>(&self, groups: &'a [Group]) -> Result<Match<'a, Group>, RouteNonMatch> {
        self.resolve(groups)
    }

    /// Selects the first route whose pattern covers the request path exactly and which allows
    /// the request method.
    pub fn routes<'a>(&self, routes: &'a [Route]) -> Result<Match<'a, Route>, RouteNonMatch> {
        self.resolve(routes)
    }

    fn resolve<'a, T>(&self, candidates: &'a [T]) -> Result<Match<'a, T>, RouteNonMatch>
    where
        T: Routable,
    {
        let full = self.path.segments();
        let mut non_match = RouteNonMatch::new(StatusCode::NOT_FOUND);

        for candidate in candidates {
            let working = candidate.working_segments(full);
            let mut bindings = SegmentMapping::new();

            if !match_pieces(candidate.prefix().segments(), working, T::MODE, &mut bindings) {
                continue;
            }

            if candidate.allows(self.method) {
                trace!(
                    " `{}` matched `{}` for {}",
                    candidate.prefix().path(),
                    self.path.path(),
                    self.method
                );
                return Ok(Match {
                    entity: candidate,
                    bindings,
                });
            }

            trace!(
                " `{}` matched `{}` but does not allow {}",
                candidate.prefix().path(),
                self.path.path(),
                self.method
            );
            non_match = non_match.union(
                RouteNonMatch::new(StatusCode::METHOD_NOT_ALLOWED)
                    .with_allow_list(candidate.methods()),
            );
        }

        Err(non_match)
    }
}

/// Maps a resolver outcome onto a numeric code: `0` for a match, otherwise `404` or `405`.
pub fn match_status<T>(result: &Result<Match<'_, T>, RouteNonMatch>) -> u16 {
    match result {
        Ok(_) => 0,
        Err(non_match) => non_match.status().as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hyper::{Body, Response};

    use crate::helpers::http::response::create_empty_response;
    use crate::middleware::MiddlewareChain;
    use crate::router::route::dispatch::DispatcherImpl;
    use crate::state::State;

    fn handler(state: State) -> (State, Response<Body>) {
        let res = create_empty_response(&state, StatusCode::OK);
        (state, res)
    }

    fn route(parent: Option<&Prefix>, path: &str, methods: &[Method]) -> Route {
        let prefix = match parent {
            Some(parent) => Prefix::nested(parent, path),
            None => Prefix::new(path),
        };

        Route::new(
            prefix,
            methods.to_vec(),
            parent.is_some(),
            Arc::new(DispatcherImpl::new(|| Ok(handler))),
            MiddlewareChain::new(),
        )
    }

    fn group(path: &str, methods: &[Method]) -> Group {
        Group::new(Prefix::new(path), methods.to_vec(), vec![], vec![])
    }

    #[test]
    fn method_precedence_between_identical_paths() {
        let routes = vec![
            route(None, "/london/is/the/capital", &[Method::GET]),
            route(None, "/london/is/the/capital", &[Method::DELETE]),
        ];
        let path = RequestPathSegments::new("/london/is/the/capital");

        let get = RouteMatcher::new(&Method::GET, &path).routes(&routes).unwrap();
        assert!(std::ptr::eq(get.entity(), &routes[0]));

        let delete = RouteMatcher::new(&Method::DELETE, &path)
            .routes(&routes)
            .unwrap();
        assert!(std::ptr::eq(delete.entity(), &routes[1]));

        let post = RouteMatcher::new(&Method::POST, &path).routes(&routes);
        assert_eq!(match_status(&post), 405);
        assert_eq!(post.unwrap_err().allow(), vec![Method::DELETE, Method::GET]);
    }

    #[test]
    fn later_path_mismatch_never_downgrades_method_not_allowed() {
        let routes = vec![
            route(None, "/hello", &[Method::GET]),
            route(None, "/goodbye", &[]),
        ];
        let path = RequestPathSegments::new("/hello");

        let res = RouteMatcher::new(&Method::POST, &path).routes(&routes);
        assert_eq!(match_status(&res), 405);
    }

    #[test]
    fn no_match_is_not_found_without_bindings() {
        let routes = vec![route(None, "/{id}/a", &[]), route(None, "/route2", &[])];
        let path = RequestPathSegments::new("/000");

        let res = RouteMatcher::new(&Method::GET, &path).routes(&routes);
        assert_eq!(match_status(&res), 404);
        assert!(res.unwrap_err().allow().is_empty());
    }

    #[test]
    fn groups_match_prefixes_and_routes_match_exactly() {
        let groups = vec![group("/api/users", &[])];
        let routes = vec![route(None, "/api/users", &[])];
        let path = RequestPathSegments::new("/api/users/12");

        assert_eq!(match_status(&RouteMatcher::new(&Method::GET, &path).groups(&groups)), 0);
        assert_eq!(match_status(&RouteMatcher::new(&Method::GET, &path).routes(&routes)), 404);
    }

    #[test]
    fn nested_routes_strip_the_group_prefix() {
        let api = Prefix::new("/api");
        let routes = vec![route(Some(&api), "/users", &[])];
        let path = RequestPathSegments::new("/api/users");

        let res = RouteMatcher::new(&Method::GET, &path).routes(&routes);
        assert_eq!(match_status(&res), 0);
    }

    #[test]
    fn losing_candidates_leave_no_bindings() {
        let routes = vec![
            route(None, "/{word}/hello", &[]),
            route(None, "/{other}/world", &[]),
        ];
        let path = RequestPathSegments::new("/cool/world");

        let matched = RouteMatcher::new(&Method::GET, &path).routes(&routes).unwrap();
        let bindings = matched.bindings();

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings["other"], "cool");
    }

    #[test]
    fn group_methods_gate_the_request() {
        let groups = vec![
            group("/api", &[Method::GET, Method::DELETE]),
            group("/api", &[Method::POST]),
        ];
        let path = RequestPathSegments::new("/api/users/add");

        let post = RouteMatcher::new(&Method::POST, &path).groups(&groups).unwrap();
        assert!(std::ptr::eq(post.entity(), &groups[1]));

        let put = RouteMatcher::new(&Method::PUT, &path).groups(&groups);
        assert_eq!(match_status(&put), 405);
    }
}
