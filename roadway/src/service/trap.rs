//! Defines functionality for processing a request and trapping errors and panics in response
//! generation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::FutureExt;
use hyper::{Body, Response, StatusCode};
use log::{error, info};

use crate::handler::{Handler, HandlerError, IntoResponse, NewHandler};
use crate::service::timing::Timer;
use crate::state::{request_id, State};

/// Instantiates a `Handler` from the given `NewHandler`, and invokes it with the request. If a
/// panic occurs from `NewHandler::new_handler` or `Handler::handle`, it is trapped and will result
/// in a `500 Internal Server Error` response.
///
/// Timing information is recorded and logged, except in the case of a panic where the `State` is
/// lost and the request id cannot be recovered.
pub(super) async fn call_handler<T>(t: Arc<T>, state: State) -> anyhow::Result<Response<Body>>
where
    T: NewHandler,
{
    let timer = Timer::new();

    let res = AssertUnwindSafe(async move {
        // Hyper doesn't allow us to present an affine-typed `Handler` interface directly. We have
        // to emulate the promise given by hyper's documentation, by creating a `Handler` value and
        // immediately consuming it.
        let handler = t.new_handler()?;
        Ok::<_, anyhow::Error>(handler.handle(state).await)
    })
    .catch_unwind()
    .await;

    match res {
        Ok(Ok(Ok((state, res)))) => Ok(finalize_success_response(timer, state, res)),
        Ok(Ok(Err((state, err)))) => Ok(finalize_error_response(timer, state, err)),
        Ok(Err(err)) => {
            error!("[ERROR][Unable to create a handler][{:#}]", err);
            Err(err)
        }
        Err(_) => Ok(finalize_panic_response(timer)),
    }
}

fn finalize_success_response(timer: Timer, state: State, response: Response<Body>) -> Response<Body> {
    let timing = timer.elapsed();

    info!(
        "[RESPONSE][{}][{:?}][{}][{}]",
        request_id(&state),
        response.version(),
        response.status(),
        timing
    );

    timing.add_to_response(response)
}

fn finalize_error_response(timer: Timer, state: State, err: HandlerError) -> Response<Body> {
    let timing = timer.elapsed();

    error!(
        "[ERROR][{}][Error: {:#}][{}]",
        request_id(&state),
        err.cause(),
        timing
    );

    timing.add_to_response(err.into_response(&state))
}

fn finalize_panic_response(timer: Timer) -> Response<Body> {
    let timing = timer.elapsed();

    error!(
        "[PANIC][A panic occurred while invoking the handler][{}]",
        timing
    );

    let mut res = Response::new(Body::empty());
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}
