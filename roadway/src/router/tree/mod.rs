//! Defines the segment-by-segment comparison of a registered pattern with a request path.

use log::trace;

use crate::router::tree::segment::{Segment, SegmentMapping};

pub mod prefix;
pub mod segment;

/// How much of the request path a pattern must cover.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchMode {
    /// The pattern may cover only the leading segments of the request. Used for groups, whose
    /// nested routes consume the remainder.
    Prefix,

    /// The pattern must cover the request exactly. Used for routes.
    Exact,
}

/// Compares `pattern` with the `request` segments, writing variable bindings into `bindings`.
///
/// An empty pattern only matches an empty request, in either mode. Bindings may be written before
/// a later literal mismatch fails the comparison, so callers pass a scratch mapping and discard it
/// when `false` is returned.
///
/// ```rust
/// use roadway::router::tree::{match_pieces, MatchMode};
/// use roadway::router::tree::prefix::Prefix;
/// use roadway::router::tree::segment::SegmentMapping;
///
/// let pattern = Prefix::new("/{word}/hello/{who}");
/// let mut bindings = SegmentMapping::new();
///
/// assert!(match_pieces(
///     pattern.segments(),
///     &["coolword", "hello", "world"],
///     MatchMode::Exact,
///     &mut bindings,
/// ));
/// assert_eq!(bindings["word"], "coolword");
/// assert_eq!(bindings["who"], "world");
/// ```
pub fn match_pieces<S>(
    pattern: &[Segment],
    request: &[S],
    mode: MatchMode,
    bindings: &mut SegmentMapping,
) -> bool
where
    S: AsRef<str>,
{
    if pattern.is_empty() {
        return request.is_empty();
    }

    let fits = match mode {
        MatchMode::Prefix => pattern.len() <= request.len(),
        MatchMode::Exact => pattern.len() == request.len(),
    };

    if !fits {
        trace!(
            " pattern of {} segments cannot match {} request segments ({:?})",
            pattern.len(),
            request.len(),
            mode
        );
        return false;
    }

    pattern
        .iter()
        .zip(request)
        .all(|(segment, value)| segment.matches(value.as_ref(), bindings))
}
