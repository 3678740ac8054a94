//! Defines types for timing requests and emitting timing information into logs and responses.

use std::fmt::{self, Display, Formatter};
use std::time::Instant;

use hyper::header::HeaderValue;
use hyper::{Body, Response};

/// Header carrying the time spent producing a response.
const X_RUNTIME_DURATION: &str = "x-runtime-duration";

/// Used by `RoadwayService` to time requests. The `elapsed` function returns the elapsed time
/// in a way that can be used for logging and adding the `X-Runtime-Duration` header to
/// responses.
#[derive(Clone, Copy)]
pub(super) struct Timer {
    start: Instant,
}

impl Timer {
    /// Begins measuring from the current time.
    pub(super) fn new() -> Timer {
        Timer {
            start: Instant::now(),
        }
    }

    /// Finishes measuring, and returns the elapsed time as a `Timing` value.
    pub(super) fn elapsed(self) -> Timing {
        Timing(self.start.elapsed().as_micros())
    }
}

/// Represents an elapsed time measured by `Timer`, in microseconds.
#[derive(Clone, Copy)]
pub(super) struct Timing(u128);

impl Timing {
    /// Adds the `X-Runtime-Duration` header to a `Response`.
    pub(super) fn add_to_response(&self, mut response: Response<Body>) -> Response<Body> {
        if let Ok(value) = HeaderValue::from_str(&format!("{}us", self.0)) {
            response.headers_mut().insert(X_RUNTIME_DURATION, value);
        }
        response
    }
}

impl Display for Timing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)?;
        f.write_str("µs")
    }
}
