//! Defines `Group`, a shared path prefix for a set of routes and nested groups.

use std::fmt;

use hyper::Method;

use crate::middleware::MiddlewareChain;
use crate::router::route::Route;
use crate::router::tree::prefix::Prefix;

/// A path prefix owning an ordered list of routes and nested groups.
///
/// Routes and groups registered inside a `Group` write their paths relative to it. A group only
/// lets through the methods it allows, before any of its routes are considered.
pub struct Group {
    prefix: Prefix,
    methods: Vec<Method>,
    routes: Vec<Route>,
    groups: Vec<Group>,
}

impl Group {
    pub(crate) fn new(
        prefix: Prefix,
        methods: Vec<Method>,
        routes: Vec<Route>,
        groups: Vec<Group>,
    ) -> Group {
        Group {
            prefix,
            methods,
            routes,
            groups,
        }
    }

    /// The path of this group, relative to its parent.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// The methods this group lets through. Empty when it lets through every method.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The routes registered directly inside this group, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The groups nested directly inside this group, in registration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Places `outer` around the middleware of every route in this group and its nested groups.
    pub(crate) fn wrap(&mut self, outer: &MiddlewareChain) {
        for route in &mut self.routes {
            route.wrap(outer);
        }

        for group in &mut self.groups {
            group.wrap(outer);
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("path", &self.prefix.path())
            .field("methods", &self.methods)
            .field("routes", &self.routes)
            .field("groups", &self.groups)
            .finish()
    }
}
