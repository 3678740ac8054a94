//! Helpers for HTTP response generation

use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::body::HttpBody;
use hyper::{Body, Method, Response, StatusCode};
use log::warn;
use mime::Mime;

use crate::state::request_id::try_request_id;
use crate::state::{FromState, State};

/// Header carrying the id which correlates a response with the log output of its request.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Creates a `Response` object and populates it with a set of default headers.
///
/// The `Content-Type` header is set from `mime` and the `Content-Length` from the body. When the
/// request method was `HEAD` the body is dropped while the length header is kept.
///
/// # Examples
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::helpers::http::response::create_response;
/// use roadway::state::State;
///
/// static BODY: &[u8] = b"Hello, world!";
///
/// fn handler(state: State) -> (State, Response<Body>) {
///     let response = create_response(&state, StatusCode::OK, mime::TEXT_PLAIN, BODY);
///
///     (state, response)
/// }
/// #
/// # fn main() {
/// #     use roadway::router::builder::*;
/// #     build_router(|route| route.get("/").to(handler));
/// # }
/// ```
pub fn create_response<B>(state: &State, status: StatusCode, mime: Mime, body: B) -> Response<Body>
where
    B: Into<Body>,
{
    let body = body.into();
    let length = HttpBody::size_hint(&body).exact();

    let mut res = if is_head_request(state) {
        Response::new(Body::empty())
    } else {
        Response::new(body)
    };

    *res.status_mut() = status;
    set_headers(state, &mut res, Some(mime), length);
    res
}

/// Produces a simple empty `Response` with the provided status.
///
/// ```rust
/// use hyper::StatusCode;
/// use roadway::helpers::http::response::create_empty_response;
/// use roadway::state::State;
///
/// State::with_new(|state| {
///     let res = create_empty_response(state, StatusCode::NOT_FOUND);
///     assert_eq!(res.status(), StatusCode::NOT_FOUND);
/// });
/// ```
pub fn create_empty_response(state: &State, status: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = status;
    set_headers(state, &mut res, None, Some(0));
    res
}

fn is_head_request(state: &State) -> bool {
    Method::try_borrow_from(state)
        .map(|method| method == Method::HEAD)
        .unwrap_or(false)
}

/// Sets the request id, content type and content length headers on a `Response`.
///
/// The request id is only written when one has been assigned to the `State`, which the service
/// does for every incoming request.
pub fn set_headers(state: &State, res: &mut Response<Body>, mime: Option<Mime>, length: Option<u64>) {
    let headers: &mut HeaderMap = res.headers_mut();

    if let Some(id) = try_request_id(state) {
        match HeaderValue::from_str(id) {
            Ok(value) => {
                headers.insert(X_REQUEST_ID, value);
            }
            Err(_) => warn!("[{}] request id is not a valid header value, skipping", id),
        }
    }

    if let Some(mime) = mime {
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            headers.insert(CONTENT_TYPE, value);
        }
    }

    if let Some(length) = length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    }
}
