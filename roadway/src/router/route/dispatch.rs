//! Defines the route `Dispatcher` and supporting types.

use std::pin::Pin;

use futures_util::future::{self, FutureExt};
use log::trace;

use crate::handler::{Handler, HandlerError, HandlerFuture, NewHandler};
use crate::state::{request_id, State};

/// Used by `Router` to dispatch requests into the configured `Handler`.
pub trait Dispatcher: Send + Sync {
    /// Dispatches a request to the `Handler` represented by this `Dispatcher`.
    fn dispatch(&self, state: State) -> Pin<Box<HandlerFuture>>;
}

/// Default implementation of the `Dispatcher` trait.
pub struct DispatcherImpl<H>
where
    H: NewHandler,
{
    new_handler: H,
}

impl<H> DispatcherImpl<H>
where
    H: NewHandler,
    H::Instance: 'static,
{
    /// Creates a new `DispatcherImpl`.
    ///
    /// * `new_handler` - The `NewHandler` asked for a fresh `Handler` on every dispatch.
    pub fn new(new_handler: H) -> Self {
        DispatcherImpl { new_handler }
    }
}

impl<H> Dispatcher for DispatcherImpl<H>
where
    H: NewHandler,
    H::Instance: Send + 'static,
{
    fn dispatch(&self, state: State) -> Pin<Box<HandlerFuture>> {
        match self.new_handler.new_handler() {
            Ok(h) => {
                trace!("[{}] cloning handler", request_id(&state));
                h.handle(state)
            }
            Err(e) => {
                trace!("[{}] error cloning handler", request_id(&state));
                future::err((state, HandlerError::from(e))).boxed()
            }
        }
    }
}
