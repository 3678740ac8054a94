//! Defines a unique id per `Request` that should be output with all logging

use hyper::header::{HeaderMap, HeaderValue};
use log::trace;
use uuid::Uuid;

use crate::state::{FromState, State};

/// Holds details about the current Request that are useful for enhancing logging.
#[derive(Clone)]
pub(crate) struct RequestId {
    val: String,
}

/// Sets a unique identifier for the request if it has not already been stored.
///
/// 1. If the header X-Request-ID is provided this value is used as is;
/// 2. Alternatively creates and stores a UUID v4 value.
pub(crate) fn set_request_id(state: &mut State) -> &str {
    if !state.has::<RequestId>() {
        let external = HeaderMap::<HeaderValue>::try_borrow_from(state)
            .and_then(|headers| headers.get("x-request-id"))
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let request_id = match external {
            Some(val) => {
                trace!(
                    "[{}] RequestId set from external source via X-Request-ID header",
                    val
                );
                RequestId { val }
            }
            None => {
                let val = Uuid::new_v4().hyphenated().to_string();
                trace!("[{}] RequestId generated internally", val);
                RequestId { val }
            }
        };
        state.put(request_id);
    };

    request_id(state)
}

/// Returns the unique Id associated with the current request.
///
/// This is very useful for logging/correlating events across distributed systems.
///
/// # Panics
///
/// Will panic if the service has not already populated `State` with a value for `RequestId`
/// prior to handing control to middleware and application handlers.
pub fn request_id(state: &State) -> &str {
    match try_request_id(state) {
        Some(id) => id,
        None => panic!("RequestId must be populated before application code is invoked"),
    }
}

/// Returns the unique Id associated with the current request, if one was assigned.
pub fn try_request_id(state: &State) -> Option<&str> {
    RequestId::try_borrow_from(state).map(|request_id| request_id.val.as_str())
}
