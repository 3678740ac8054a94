//! Defines `Fallbacks`, the handlers invoked when no route serves a request.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::{self, FutureExt, TryFutureExt};
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, StatusCode};
use log::trace;

use crate::handler::HandlerFuture;
use crate::helpers::http::response::create_empty_response;
use crate::router::non_match::RouteNonMatch;
use crate::router::route::dispatch::Dispatcher;
use crate::state::{request_id, State};

/// Holds an immutable collection of fallback handlers, one per status code, as configured using
/// `RouterBuilder::not_found` and `RouterBuilder::method_not_allowed`.
///
/// Before a fallback runs, the `RouteNonMatch` describing the failure is stored in `State`, so the
/// handler can inspect the status and the allowed methods. Without a configured handler the
/// fallback responds with an empty body and the status. A `405 Method Not Allowed` response
/// always carries an `Allow` header, unless the handler set one itself.
#[derive(Clone, Default)]
pub struct Fallbacks {
    handlers: HashMap<StatusCode, Arc<dyn Dispatcher>>,
}

impl Fallbacks {
    pub(crate) fn new() -> Self {
        Fallbacks::default()
    }

    pub(crate) fn insert(&mut self, status: StatusCode, dispatcher: Arc<dyn Dispatcher>) {
        trace!(" adding fallback handler for {}", status);
        self.handlers.insert(status, dispatcher);
    }

    /// Determines if a handler was configured for `status`.
    pub fn has(&self, status: StatusCode) -> bool {
        self.handlers.contains_key(&status)
    }

    pub(crate) fn respond(
        &self,
        mut state: State,
        non_match: RouteNonMatch,
    ) -> Pin<Box<HandlerFuture>> {
        let status = non_match.status();
        let allow = non_match.allow();
        state.put(non_match);

        let f = match self.handlers.get(&status) {
            Some(dispatcher) => {
                trace!("[{}] invoking {} fallback", request_id(&state), status);
                dispatcher.dispatch(state)
            }
            None => {
                trace!(
                    "[{}] no fallback for {}, responding empty",
                    request_id(&state),
                    status
                );
                let res = create_empty_response(&state, status);
                future::ok((state, res)).boxed()
            }
        };

        if status != StatusCode::METHOD_NOT_ALLOWED || allow.is_empty() {
            return f;
        }

        let allow = allow_header(&allow);
        f.map_ok(move |(state, mut res)| {
            if let Some(value) = allow {
                res.headers_mut().entry(ALLOW).or_insert(value);
            }
            (state, res)
        })
        .boxed()
    }
}

fn allow_header(allow: &[Method]) -> Option<HeaderValue> {
    let value = allow
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    HeaderValue::from_str(&value).ok()
}

impl fmt::Debug for Fallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
