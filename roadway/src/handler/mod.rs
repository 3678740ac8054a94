//! Defines types for handlers, the application code which runs once a request has been routed.
//!
//! A function can be used directly as a handler using one of the [default implementations of
//! `Handler`][handler-impl], but the trait can also be implemented directly for greater control.
//!
//! [handler-impl]: trait.Handler.html#implementors

use std::future::Future;
use std::pin::Pin;

use futures_util::future::{self, FutureExt};
use hyper::{Body, Response, StatusCode};
use mime::Mime;

use crate::helpers::http::response::create_response;
use crate::state::State;

mod error;

pub use self::error::{HandlerError, MapHandlerError};

/// A type alias for the results returned by async fns that can be passed to `to_async`.
pub type HandlerResult = Result<(State, Response<Body>), (State, HandlerError)>;

/// A type alias for the results returned by async fns which do not hand back `State`.
pub type SimpleHandlerResult = Result<Response<Body>, HandlerError>;

/// A type alias for the trait objects returned by `Handler`.
///
/// When the `Future` resolves to an error, the `(State, HandlerError)` value is used to generate
/// an appropriate HTTP error response.
pub type HandlerFuture = dyn Future<Output = HandlerResult> + Send;

/// A `Handler` receives some subset of requests to the application, and returns a future which
/// resolves to a response. This represents the common entry point for the parts of a roadway
/// application, implemented by the `Router` and by every routed function.
///
/// The `Handler` is created by its `NewHandler` implementation, and is used for a single request.
///
/// # Examples
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::helpers::http::response::create_empty_response;
/// use roadway::router::builder::*;
/// use roadway::state::State;
///
/// fn my_handler(state: State) -> (State, Response<Body>) {
///     let res = create_empty_response(&state, StatusCode::OK);
///     (state, res)
/// }
/// #
/// # fn main() {
/// #     build_router(|route| route.get("/").to(my_handler));
/// # }
/// ```
pub trait Handler: Send {
    /// Handles the request, returning a boxed future which resolves to a response.
    fn handle(self, state: State) -> Pin<Box<HandlerFuture>>;
}

impl<F, R> Handler for F
where
    F: FnOnce(State) -> R + Send,
    R: IntoHandlerFuture,
{
    fn handle(self, state: State) -> Pin<Box<HandlerFuture>> {
        self(state).into_handler_future()
    }
}

/// Creates new `Handler` values.
///
/// The router keeps one `NewHandler` per route and asks it for a fresh `Handler` for every
/// request which the route serves.
pub trait NewHandler: Send + Sync {
    /// The type of `Handler` created by the `NewHandler`.
    type Instance: Handler + Send;

    /// Create and return a new `Handler` value.
    fn new_handler(&self) -> anyhow::Result<Self::Instance>;
}

impl<F, H> NewHandler for F
where
    F: Fn() -> anyhow::Result<H> + Send + Sync,
    H: Handler + Send,
{
    type Instance = H;

    fn new_handler(&self) -> anyhow::Result<H> {
        self()
    }
}

/// Represents a type which can be converted into the future type returned by a `Handler`.
///
/// This is used to allow functions with different return types to satisfy the `Handler` trait
/// bound via the generic function implementation.
pub trait IntoHandlerFuture {
    /// Converts this value into a boxed future resolving to a state and response.
    fn into_handler_future(self) -> Pin<Box<HandlerFuture>>;
}

impl<T> IntoHandlerFuture for (State, T)
where
    T: IntoResponse,
{
    fn into_handler_future(self) -> Pin<Box<HandlerFuture>> {
        let (state, t) = self;
        let response = t.into_response(&state);
        future::ok((state, response)).boxed()
    }
}

impl IntoHandlerFuture for Pin<Box<HandlerFuture>> {
    fn into_handler_future(self) -> Pin<Box<HandlerFuture>> {
        self
    }
}

/// Represents a type which can be converted to a response. This trait is used in converting the
/// return type of a function into a response.
///
/// # Examples
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::handler::IntoResponse;
/// use roadway::helpers::http::response::create_response;
/// use roadway::state::State;
///
/// struct Greeting {
///     who: String,
/// }
///
/// impl IntoResponse for Greeting {
///     fn into_response(self, state: &State) -> Response<Body> {
///         create_response(
///             state,
///             StatusCode::OK,
///             mime::TEXT_PLAIN,
///             format!("Hello, {}!", self.who),
///         )
///     }
/// }
///
/// fn handler(state: State) -> (State, Greeting) {
///     (state, Greeting { who: "world".to_owned() })
/// }
/// #
/// # fn main() {
/// #     use roadway::router::builder::*;
/// #     build_router(|route| route.get("/").to(handler));
/// # }
/// ```
pub trait IntoResponse {
    /// Converts this value into a `hyper::Response`
    fn into_response(self, state: &State) -> Response<Body>;
}

impl IntoResponse for Response<Body> {
    fn into_response(self, _state: &State) -> Response<Body> {
        self
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self, state: &State) -> Response<Body> {
        match self {
            Ok(res) => res.into_response(state),
            Err(e) => e.into_response(state),
        }
    }
}

impl<B> IntoResponse for (Mime, B)
where
    B: Into<Body>,
{
    fn into_response(self, state: &State) -> Response<Body> {
        (StatusCode::OK, self.0, self.1).into_response(state)
    }
}

impl<B> IntoResponse for (StatusCode, Mime, B)
where
    B: Into<Body>,
{
    fn into_response(self, state: &State) -> Response<Body> {
        create_response(state, self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_executor::block_on;
    use hyper::Method;

    fn status_handler(state: State) -> (State, (StatusCode, Mime, &'static str)) {
        (state, (StatusCode::ACCEPTED, mime::TEXT_PLAIN, "accepted"))
    }

    #[test]
    fn functions_are_handlers() {
        let mut state = State::new();
        state.put(Method::GET);

        let new_handler = || Ok::<_, anyhow::Error>(status_handler);
        let handler = new_handler.new_handler().unwrap();

        match block_on(handler.handle(state)) {
            Ok((_state, res)) => assert_eq!(res.status(), StatusCode::ACCEPTED),
            Err(_) => panic!("handler failed"),
        }
    }

    #[test]
    fn async_handlers_are_boxed_futures() {
        let handler = |state: State| -> Pin<Box<HandlerFuture>> {
            async move {
                let err = HandlerError::from(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "boom",
                ))
                .with_status(StatusCode::SERVICE_UNAVAILABLE);
                let result: HandlerResult = Err((state, err));
                result
            }
            .boxed()
        };

        match block_on(handler.handle(State::new())) {
            Ok(_) => panic!("expected an error"),
            Err((_state, err)) => assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE),
        }
    }
}
