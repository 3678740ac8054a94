use std::future::Future;

use futures_util::future::FutureExt;

use crate::handler::{Handler, HandlerResult, NewHandler};
use crate::router::builder::SingleRouteBuilder;
use crate::state::State;

/// Describes the API for defining a single route, after determining which request paths will be
/// dispatched here. The API here uses chained function calls to build and add the route into the
/// builder which created it.
///
/// # Examples
///
/// ```rust
/// # use hyper::{Body, Response};
/// # use roadway::state::State;
/// # use roadway::router::Router;
/// # use roadway::router::builder::*;
/// #
/// fn my_handler(_: State) -> (State, Response<Body>) {
///     // Handler implementation elided.
/// #   unimplemented!()
/// }
/// #
/// # fn router() -> Router {
/// build_router(|route| {
///     route.get("/request/path") // <- This value implements `DefineSingleRoute`
///          .to(my_handler);
/// })
/// # }
/// # fn main() { router(); }
/// ```
pub trait DefineSingleRoute {
    /// Directs the route to the given `Handler`, automatically creating a `NewHandler` which
    /// copies the `Handler`. This is the easiest option for code which is using bare functions as
    /// `Handler` functions.
    fn to<H>(self, handler: H)
    where
        H: Handler + Copy + Send + Sync + 'static;

    /// Similar to `to`, but accepts an `async fn`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::StatusCode;
    /// # use roadway::handler::HandlerResult;
    /// # use roadway::helpers::http::response::create_empty_response;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// # use roadway::state::State;
    /// #
    /// async fn my_handler(state: State) -> HandlerResult {
    ///     let res = create_empty_response(&state, StatusCode::OK);
    ///     Ok((state, res))
    /// }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.get("/request/path").to_async(my_handler);
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn to_async<H, Fut>(self, handler: H)
    where
        Self: Sized,
        H: (FnOnce(State) -> Fut) + Copy + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.to(move |state: State| handler(state).boxed())
    }

    /// Directs the route to the given `NewHandler`. This gives more control over how `Handler`
    /// values are constructed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hyper::StatusCode;
    /// # use roadway::handler::{Handler, HandlerFuture, IntoHandlerFuture, NewHandler};
    /// # use roadway::helpers::http::response::create_empty_response;
    /// # use roadway::router::Router;
    /// # use roadway::router::builder::*;
    /// # use roadway::state::State;
    /// # use std::pin::Pin;
    /// #
    /// struct MyNewHandler;
    /// struct MyHandler;
    ///
    /// impl NewHandler for MyNewHandler {
    ///     type Instance = MyHandler;
    ///
    ///     fn new_handler(&self) -> anyhow::Result<Self::Instance> {
    ///         Ok(MyHandler)
    ///     }
    /// }
    ///
    /// impl Handler for MyHandler {
    ///     fn handle(self, state: State) -> Pin<Box<HandlerFuture>> {
    ///         let res = create_empty_response(&state, StatusCode::ACCEPTED);
    ///         (state, res).into_handler_future()
    ///     }
    /// }
    /// #
    /// # fn router() -> Router {
    /// build_router(|route| {
    ///     route.get("/request/path").to_new_handler(MyNewHandler);
    /// })
    /// # }
    /// # fn main() { router(); }
    /// ```
    fn to_new_handler<NH>(self, new_handler: NH)
    where
        NH: NewHandler + 'static,
        NH::Instance: Send + 'static;
}

impl<'a> DefineSingleRoute for SingleRouteBuilder<'a> {
    fn to<H>(self, handler: H)
    where
        H: Handler + Copy + Send + Sync + 'static,
    {
        self.to_new_handler(move || Ok(handler))
    }

    fn to_new_handler<NH>(self, new_handler: NH)
    where
        NH: NewHandler + 'static,
        NH::Instance: Send + 'static,
    {
        self.finish(new_handler)
    }
}
