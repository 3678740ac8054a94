use hyper::Method;

use crate::middleware::MiddlewareChain;
use crate::router::builder::{GroupBuilder, SingleRouteBuilder};
use crate::router::group::Group;
use crate::router::route::Route;
use crate::router::tree::prefix::Prefix;

/// Defines functions used by a builder to determine which request paths will be dispatched to a
/// route. This trait is implemented by the top-level `RouterBuilder`, and also the `GroupBuilder`
/// created by `DrawRoutes::group`.
///
/// Paths are normalized as they are registered, so `"////hello//world//ok"` and
/// `"/hello/world/ok"` describe the same route. A segment wrapped in braces, such as `{id}`, is a
/// variable matching any single request segment.
pub trait DrawRoutes {
    /// Creates a route which matches `GET` requests to the given path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::{Body, Response};
    /// # use roadway::state::State;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// #
    /// # fn my_handler(_: State) -> (State, Response<Body>) {
    /// #   unreachable!()
    /// # }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.get("/request/path").to(my_handler);
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn get<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::GET], path)
    }

    /// Creates a route which matches `HEAD` requests to the given path.
    fn head<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::HEAD], path)
    }

    /// Creates a route which matches `POST` requests to the given path.
    fn post<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::POST], path)
    }

    /// Creates a route which matches `PUT` requests to the given path.
    fn put<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::PUT], path)
    }

    /// Creates a route which matches `PATCH` requests to the given path.
    fn patch<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::PATCH], path)
    }

    /// Creates a route which matches `DELETE` requests to the given path.
    fn delete<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::DELETE], path)
    }

    /// Creates a route which matches `OPTIONS` requests to the given path.
    fn options<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![Method::OPTIONS], path)
    }

    /// Creates a route which matches requests of any method to the given path. The methods can be
    /// narrowed afterwards with `SingleRouteBuilder::methods`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::{Body, Method, Response};
    /// # use roadway::state::State;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// #
    /// # fn my_handler(_: State) -> (State, Response<Body>) {
    /// #   unreachable!()
    /// # }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.path("/any/method").to(my_handler);
    ///     route
    ///         .path("/read/only")
    ///         .methods(&[Method::GET, Method::HEAD])
    ///         .to(my_handler);
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn path<'b>(&'b mut self, path: &str) -> SingleRouteBuilder<'b> {
        self.request(vec![], path)
    }

    /// Creates a single route which matches any of the given `methods` to the given path. An
    /// empty list of methods matches every method.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::{Body, Response};
    /// # use hyper::Method;
    /// # use roadway::state::State;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// #
    /// # fn my_handler(_: State) -> (State, Response<Body>) {
    /// #   unreachable!()
    /// # }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.request(vec![Method::GET, Method::HEAD], "/request/path").to(my_handler);
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn request<'b>(&'b mut self, methods: Vec<Method>, path: &str) -> SingleRouteBuilder<'b> {
        let (parent, routes, _) = self.component_refs();

        let under_group = parent.is_some();
        let prefix = match parent {
            Some(parent) => Prefix::nested(parent, path),
            None => Prefix::new(path),
        };

        SingleRouteBuilder {
            routes,
            prefix,
            under_group,
            methods,
            middleware: MiddlewareChain::new(),
        }
    }

    /// Begins defining a new group, based on a given `path` prefix. Paths registered inside the
    /// group are relative to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::{Body, Response};
    /// # use roadway::state::State;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// # mod api {
    /// #   use super::*;
    /// #   pub fn list(_: State) -> (State, Response<Body>) {
    /// #       unreachable!()
    /// #   }
    /// # }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.group("/api", |group| {
    ///         // Match requests to `/api/list`
    ///         group.get("/list").to(api::list);
    ///     });
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn group<F>(&mut self, path: &str, f: F)
    where
        F: FnOnce(&mut GroupBuilder),
    {
        let (parent, _, groups) = self.component_refs();

        let prefix = match parent {
            Some(parent) => Prefix::nested(parent, path),
            None => Prefix::new(path),
        };

        let mut group_builder = GroupBuilder::new(prefix);
        f(&mut group_builder);
        groups.push(group_builder.finalize());
    }

    /// Return the components that comprise this builder. For internal use only.
    #[doc(hidden)]
    fn component_refs(&mut self) -> (Option<&Prefix>, &mut Vec<Route>, &mut Vec<Group>);
}
