//! Defines `Segment` and `SegmentType`, the classified form of one piece of a registered path.
use std::collections::HashMap;
use std::fmt;

use log::trace;

/// Mapping of variable names to the request segment each one captured.
pub type SegmentMapping = HashMap<String, String>;

const VARIABLE_OPEN: char = '{';
const VARIABLE_CLOSE: char = '}';

/// Indicates how a `Segment` of a registered path is compared with a request segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SegmentType {
    /// Is matched exactly (string equality) to the segment for incoming request paths.
    ///
    /// Unlike `Dynamic` segments, values matched by this segment are **not** stored as path
    /// variables.
    Static,

    /// Matches any corresponding segment for incoming request paths, binding it to the variable
    /// name of the segment.
    Dynamic,
}

/// One classified piece of a registered path.
///
/// A piece is a variable only when it is wrapped in braces in full and the name between them is
/// not empty:
///
/// ```rust
/// use roadway::router::tree::segment::{Segment, SegmentType};
///
/// assert_eq!(Segment::parse("{id}").segment_type(), SegmentType::Dynamic);
/// assert_eq!(Segment::parse("{id}").name(), "id");
///
/// assert_eq!(Segment::parse("a{id}").segment_type(), SegmentType::Static);
/// assert_eq!(Segment::parse("{}").segment_type(), SegmentType::Static);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    name: String,
    segment_type: SegmentType,
}

impl Segment {
    /// Classifies a single piece of a registered path.
    pub fn parse(raw: &str) -> Segment {
        let variable = raw
            .strip_prefix(VARIABLE_OPEN)
            .and_then(|rest| rest.strip_suffix(VARIABLE_CLOSE))
            .filter(|name| !name.is_empty());

        match variable {
            Some(name) => {
                trace!(" classified `{}` as variable `{}`", raw, name);
                Segment {
                    name: name.to_owned(),
                    segment_type: SegmentType::Dynamic,
                }
            }
            None => Segment {
                name: raw.to_owned(),
                segment_type: SegmentType::Static,
            },
        }
    }

    /// How this segment is compared with request segments.
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// The literal text of a `Static` segment, or the variable name of a `Dynamic` one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when this segment is a variable placeholder.
    pub fn is_variable(&self) -> bool {
        self.segment_type == SegmentType::Dynamic
    }

    /// Determines if this segment accepts the request segment `value`. Literals compare by exact
    /// equality, and variables accept anything.
    pub fn is_match(&self, value: &str) -> bool {
        match self.segment_type {
            SegmentType::Static => self.name == value,
            SegmentType::Dynamic => true,
        }
    }

    /// Compares this segment with one request segment, binding the value into `bindings` when
    /// this segment is a variable.
    pub(crate) fn matches(&self, value: &str, bindings: &mut SegmentMapping) -> bool {
        if !self.is_match(value) {
            return false;
        }

        if self.is_variable() {
            bindings.insert(self.name.clone(), value.to_owned());
        }
        true
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment_type {
            SegmentType::Static => f.write_str(&self.name),
            SegmentType::Dynamic => write!(f, "{}{}{}", VARIABLE_OPEN, self.name, VARIABLE_CLOSE),
        }
    }
}
