//! Defines helper functions for processing the request path

use crate::helpers::http::percent_decode;

const SEPARATOR: char = '/';

/// Holder for `Request` URI path segments that have been split into individual segments.
///
/// Used internally by the `Router` when resolving groups and routes. Empty segments are skipped,
/// so a request path of `////some/path/to//my/handler/` is represented as:
///
/// ```plain
/// path:     "/some/path/to/my/handler"
/// segments: ["some", "path", "to", "my", "handler"]
/// ```
///
/// The root path (and any path made only of separators, or the empty string) has the canonical
/// form `"/"` and no segments at all.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestPathSegments {
    path: String,
    segments: Vec<String>,
}

impl RequestPathSegments {
    /// Creates a new `RequestPathSegments` instance by normalizing a raw `Request` URI path.
    ///
    /// The path is percent-decoded before it is split, so an encoded separator (`%2F`) separates
    /// segments just like a literal one.
    ///
    /// ```rust
    /// use roadway::helpers::http::request::path::RequestPathSegments;
    ///
    /// let rps = RequestPathSegments::new("////hello//world//ok");
    /// assert_eq!(rps.path(), "/hello/world/ok");
    /// assert_eq!(rps.segments(), &["hello", "world", "ok"]);
    /// ```
    pub fn new(raw: &str) -> Self {
        let decoded = percent_decode(raw);
        let segments: Vec<String> = split(&decoded).map(ToOwned::to_owned).collect();
        let path = join(&segments);

        RequestPathSegments { path, segments }
    }

    /// The canonical form of the request path: a single leading separator and no repeated or
    /// trailing separators.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The ordered segments of the request path. Empty for the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the request targets the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Normalizes a path supplied at registration time, without percent-decoding it.
///
/// ```rust
/// use roadway::helpers::http::request::path::normalize_path;
///
/// assert_eq!(normalize_path("/london//is///the/capital/"), "/london/is/the/capital");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(raw: &str) -> String {
    join(&split(raw).collect::<Vec<_>>())
}

pub(crate) fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEPARATOR).filter(|s| !s.is_empty())
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::with_capacity(segments.iter().map(|s| s.as_ref().len() + 1).sum());
    for segment in segments {
        path.push(SEPARATOR);
        path.push_str(segment.as_ref());
    }

    if path.is_empty() {
        path.push(SEPARATOR);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_segments_tests() {
        let rps = RequestPathSegments::new("/some/path/to//my/handler");

        assert_eq!(rps.segments(), &["some", "path", "to", "my", "handler"]);
        assert_eq!(rps.path(), "/some/path/to/my/handler");
    }

    #[test]
    fn repeated_and_trailing_separators_are_irrelevant() {
        let noisy = RequestPathSegments::new("////hello//world//ok//");
        let clean = RequestPathSegments::new("/hello/world/ok");

        assert_eq!(noisy, clean);
        assert_eq!(RequestPathSegments::new("hello/world/ok"), clean);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in &["", "/", "///", "a", "/a/b/", "//x//{id}//"] {
            let once = normalize_path(raw);
            assert_eq!(normalize_path(&once), once);

            let rps = RequestPathSegments::new(raw);
            assert_eq!(RequestPathSegments::new(rps.path()), rps);
        }
    }

    #[test]
    fn root_has_no_segments() {
        for raw in &["", "/", "/////"] {
            let rps = RequestPathSegments::new(raw);
            assert!(rps.is_root());
            assert!(rps.segments().is_empty());
            assert_eq!(rps.path(), "/");
        }
    }

    #[test]
    fn segments_are_percent_decoded() {
        let rps = RequestPathSegments::new("/%61ctiv%61te/hello%20world");
        assert_eq!(rps.segments(), &["activate", "hello world"]);
    }

    #[test]
    fn encoded_separators_split_segments() {
        let rps = RequestPathSegments::new("/api%2Fusers%2F%2F42");
        assert_eq!(rps.segments(), &["api", "users", "42"]);
        assert_eq!(rps, RequestPathSegments::new("/api/users/42"));
        assert_eq!(RequestPathSegments::new(rps.path()), rps);
    }
}
