//! Defines `Prefix`, the registered path of a group or route.

use log::trace;

use crate::helpers::http::request::path::{normalize_path, split};
use crate::router::tree::segment::Segment;

/// The normalized, classified path of a group or route, along with the number of leading request
/// segments which belong to the groups enclosing it.
///
/// Nested patterns are written relative to their parent group. The excluded segment count is what
/// lets the router strip the parent's part back out of a full request path before comparing it
/// with a nested pattern.
///
/// ```rust
/// use roadway::router::tree::prefix::Prefix;
///
/// let api = Prefix::new("/api/");
/// let users = Prefix::nested(&api, "users/{id}");
///
/// assert_eq!(users.path(), "/users/{id}");
/// assert_eq!(users.exclude(), 1);
/// assert_eq!(users.excluded(&["api", "users", "12"]), &["users", "12"]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prefix {
    path: String,
    segments: Vec<Segment>,
    exclude: usize,
}

impl Prefix {
    /// Creates a `Prefix` for a group or route registered at the root of the router.
    pub fn new(raw: &str) -> Prefix {
        Prefix::with_exclude(raw, 0)
    }

    /// Creates a `Prefix` for a group or route registered inside the group owning `parent`.
    pub fn nested(parent: &Prefix, raw: &str) -> Prefix {
        Prefix::with_exclude(raw, parent.exclude + parent.segments.len())
    }

    fn with_exclude(raw: &str, exclude: usize) -> Prefix {
        let path = normalize_path(raw);
        let segments: Vec<Segment> = split(&path).map(Segment::parse).collect();
        trace!(
            " registered prefix `{}` with {} segments, excluding {}",
            path,
            segments.len(),
            exclude
        );

        Prefix {
            path,
            segments,
            exclude,
        }
    }

    /// The normalized path, relative to the enclosing group.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The classified segments of the path.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of leading request segments which belong to enclosing groups.
    pub fn exclude(&self) -> usize {
        self.exclude
    }

    /// Strips the segments of enclosing groups from a full request path. A request path which is
    /// too short to contain them leaves nothing to match.
    pub fn excluded<'r, S>(&self, full: &'r [S]) -> &'r [S] {
        full.get(self.exclude..).unwrap_or(&[])
    }
}
