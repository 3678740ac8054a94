//! Defines `RouteNonMatch`, the outcome of a resolver which found no group or route to serve a
//! request.

use std::collections::HashSet;

use hyper::{Method, StatusCode};

/// The status and allowed methods reported when no candidate served a request.
///
/// The status is `404 Not Found` when no candidate matched the request path, and
/// `405 Method Not Allowed` when at least one did but none of those allowed the request method.
/// In the latter case the allow list holds every method allowed by the path-matching candidates.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteNonMatch {
    status: StatusCode,
    allow: HashSet<Method>,
}

impl RouteNonMatch {
    /// Creates a new `RouteNonMatch` with the given status and an empty allow list.
    pub(crate) fn new(status: StatusCode) -> RouteNonMatch {
        RouteNonMatch {
            status,
            allow: HashSet::new(),
        }
    }

    pub(crate) fn with_allow_list(self, allow: &[Method]) -> RouteNonMatch {
        RouteNonMatch {
            allow: allow.iter().cloned().collect(),
            ..self
        }
    }

    /// Merges the outcomes of two candidates, keeping the status of higher precedence and every
    /// allowed method of both.
    pub(crate) fn union(self, other: RouteNonMatch) -> RouteNonMatch {
        let status = higher_precedence_status(self.status, other.status);
        let allow = self.allow.union(&other.allow).cloned().collect();
        RouteNonMatch { status, allow }
    }

    /// The status to respond with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The allowed methods, in a stable order suitable for an `Allow` header.
    pub fn allow(&self) -> Vec<Method> {
        let mut allow: Vec<Method> = self.allow.iter().cloned().collect();
        allow.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        allow
    }
}

impl From<RouteNonMatch> for StatusCode {
    fn from(val: RouteNonMatch) -> StatusCode {
        val.status
    }
}

fn higher_precedence_status(lhs: StatusCode, rhs: StatusCode) -> StatusCode {
    match (lhs, rhs) {
        // For 404, prefer candidates that indicated *some* kind of match.
        (StatusCode::NOT_FOUND, _) => rhs,
        (_, StatusCode::NOT_FOUND) => lhs,
        (_, _) => lhs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_allowed(allow: &[Method]) -> RouteNonMatch {
        RouteNonMatch::new(StatusCode::METHOD_NOT_ALLOWED).with_allow_list(allow)
    }

    #[test]
    fn method_not_allowed_beats_not_found() {
        let not_found = RouteNonMatch::new(StatusCode::NOT_FOUND);

        let status = not_found.clone().union(not_allowed(&[Method::GET])).status();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let status = not_allowed(&[Method::GET]).union(not_found).status();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn union_collects_allowed_methods() {
        let merged = not_allowed(&[Method::GET, Method::PATCH]).union(not_allowed(&[Method::DELETE]));

        assert_eq!(merged.allow(), vec![Method::DELETE, Method::GET, Method::PATCH]);
        assert_eq!(StatusCode::from(merged), StatusCode::METHOD_NOT_ALLOWED);
    }
}
