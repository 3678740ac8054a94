//! Defines the `RoadwayService` type which is used to wrap a roadway application and interface
//! with Hyper.

use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{self, Poll};
use std::thread;

use futures_util::future::{BoxFuture, FutureExt};
use hyper::service::Service;
use hyper::{Body, Request, Response};
use log::debug;

use crate::handler::NewHandler;
use crate::state::{request_id, State};

mod timing;
mod trap;

/// Wraps a `NewHandler` which will be used to serve requests. Used in `bind_server` to bind
/// incoming connections to `ConnectedRoadwayService` values.
pub(crate) struct RoadwayService<T>
where
    T: NewHandler + 'static,
{
    handler: Arc<T>,
}

impl<T> RoadwayService<T>
where
    T: NewHandler + 'static,
{
    pub(crate) fn new(handler: T) -> RoadwayService<T> {
        RoadwayService {
            handler: Arc::new(handler),
        }
    }

    pub(crate) fn connect(&self, client_addr: SocketAddr) -> ConnectedRoadwayService<T> {
        ConnectedRoadwayService {
            client_addr,
            handler: self.handler.clone(),
        }
    }
}

/// A `RoadwayService` which has been connected to a client. The major difference is that a
/// `client_addr` has been assigned (as this isn't available from Hyper).
pub(crate) struct ConnectedRoadwayService<T>
where
    T: NewHandler + 'static,
{
    handler: Arc<T>,
    client_addr: SocketAddr,
}

impl<T> Service<Request<Body>> for ConnectedRoadwayService<T>
where
    T: NewHandler,
{
    type Response = Response<Body>;
    type Error = anyhow::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut task::Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = State::from_request(req, self.client_addr);

        debug!(
            "[DEBUG][{}][Thread][{:?}]",
            request_id(&state),
            thread::current().id(),
        );

        trap::call_handler(self.handler.clone(), state).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_executor::block_on;
    use hyper::{Method, StatusCode};

    use crate::helpers::http::response::create_response;
    use crate::router::builder::*;
    use crate::router::vars;

    fn handler(state: State) -> (State, Response<Body>) {
        let who = vars(&state)
            .and_then(|vars| vars.get("who"))
            .cloned()
            .unwrap_or_default();
        let res = create_response(&state, StatusCode::ACCEPTED, mime::TEXT_PLAIN, who);
        (state, res)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn new_handler_closure() {
        let service = RoadwayService::new(|| Ok(handler));

        let f = service
            .connect("127.0.0.1:10000".parse().unwrap())
            .call(request(Method::GET, "http://localhost/"));
        let response = block_on(f).unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn router() {
        let router = build_router(|route| {
            route.get("/hello/{who}").to(handler);
        });

        let service = RoadwayService::new(router);
        let mut connected = service.connect("127.0.0.1:10000".parse().unwrap());

        let response = block_on(connected.call(request(Method::GET, "http://localhost//hello//world/"))).unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(response.headers().get("x-request-id").is_some());
        let body = block_on(hyper::body::to_bytes(response.into_body())).unwrap();
        assert_eq!(&body[..], b"world");

        let response = block_on(connected.call(request(Method::DELETE, "http://localhost/hello/world"))).unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
