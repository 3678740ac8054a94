//! Contains helpers for roadway applications to use during testing.
//!
//! See the `TestServer` type for example usage.


use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, Response, Uri};
use log::{info, warn};
use tokio::net::TcpListener;
use tokio::runtime::{self, Runtime};

use crate::bind_server;
use crate::handler::NewHandler;

pub use self::request::TestRequest;

/// The `TestServer` type, which is used as a harness when writing test cases for roadway
/// applications.
///
/// The server listens on an ephemeral loopback port and runs on its own runtime, so tests drive
/// it from ordinary synchronous `#[test]` functions.
///
/// # Examples
///
/// ```rust
/// use hyper::{Body, Response, StatusCode};
/// use roadway::helpers::http::response::create_empty_response;
/// use roadway::state::State;
/// use roadway::test::TestServer;
///
/// fn my_handler(state: State) -> (State, Response<Body>) {
///     let res = create_empty_response(&state, StatusCode::ACCEPTED);
///     (state, res)
/// }
///
/// let test_server = TestServer::new(|| Ok(my_handler)).unwrap();
///
/// let response = test_server
///     .client()
///     .get("http://localhost/")
///     .perform()
///     .unwrap();
/// assert_eq!(response.status(), StatusCode::ACCEPTED);
/// ```
#[derive(Clone)]
pub struct TestServer {
    data: Arc<TestServerData>,
}

struct TestServerData {
    addr: SocketAddr,
    timeout: Duration,
    runtime: Runtime,
}

impl TestServer {
    /// Creates a `TestServer` instance for the `Handler` spawned by `new_handler`. This server has
    /// the same guarantee given by `hyper::server::Http::bind`, that a new service will be spawned
    /// for each connection.
    ///
    /// Requests will time out after 10 seconds by default. Use `TestServer::with_timeout` for a
    /// different timeout.
    pub fn new<NH>(new_handler: NH) -> anyhow::Result<TestServer>
    where
        NH: NewHandler + 'static,
    {
        TestServer::with_timeout(new_handler, 10)
    }

    /// Sets the request timeout to `timeout` seconds and returns a new `TestServer`.
    pub fn with_timeout<NH>(new_handler: NH, timeout: u64) -> anyhow::Result<TestServer>
    where
        NH: NewHandler + 'static,
    {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("roadway-test-server")
            .enable_all()
            .build()?;

        let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0"))?;
        let addr = listener.local_addr()?;
        runtime.spawn(bind_server(listener, new_handler));

        info!(" test server listening on http://{}", addr);

        Ok(TestServer {
            data: Arc::new(TestServerData {
                addr,
                timeout: Duration::from_secs(timeout),
                runtime,
            }),
        })
    }

    /// Returns a client connected to the `TestServer`.
    pub fn client(&self) -> TestClient {
        TestClient {
            client: Client::new(),
            test_server: self.clone(),
        }
    }

    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.data.addr
    }

    /// Runs `f` on the server's runtime until it completes or the timeout elapses.
    fn run_request<F, T>(&self, f: F) -> anyhow::Result<T>
    where
        F: std::future::Future<Output = anyhow::Result<T>>,
    {
        let timeout = self.data.timeout;
        self.data.runtime.block_on(async move {
            match tokio::time::timeout(timeout, f).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("run_request timed out");
                    Err(anyhow!("timed out"))
                }
            }
        })
    }
}

/// Client interface for issuing requests to a `TestServer`.
///
/// Request targets may be full URLs, whose authority is replaced with the address of the server,
/// or bare paths. Paths are sent as given, without normalization.
pub struct TestClient {
    client: Client<HttpConnector, Body>,
    test_server: TestServer,
}

impl TestClient {
    /// Begin constructing a HEAD request using this `TestClient`.
    pub fn head(&self, uri: &str) -> TestRequest<'_> {
        self.build_request(Method::HEAD, uri)
    }

    /// Begin constructing a GET request using this `TestClient`.
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.build_request(Method::GET, uri)
    }

    /// Begin constructing an OPTIONS request using this `TestClient`.
    pub fn options(&self, uri: &str) -> TestRequest<'_> {
        self.build_request(Method::OPTIONS, uri)
    }

    /// Begin constructing a POST request using this `TestClient`.
    pub fn post<B>(&self, uri: &str, body: B, mime: mime::Mime) -> TestRequest<'_>
    where
        B: Into<Body>,
    {
        self.build_request(Method::POST, uri).with_body(body, mime)
    }

    /// Begin constructing a PUT request using this `TestClient`.
    pub fn put<B>(&self, uri: &str, body: B, mime: mime::Mime) -> TestRequest<'_>
    where
        B: Into<Body>,
    {
        self.build_request(Method::PUT, uri).with_body(body, mime)
    }

    /// Begin constructing a PATCH request using this `TestClient`.
    pub fn patch<B>(&self, uri: &str, body: B, mime: mime::Mime) -> TestRequest<'_>
    where
        B: Into<Body>,
    {
        self.build_request(Method::PATCH, uri).with_body(body, mime)
    }

    /// Begin constructing a DELETE request using this `TestClient`.
    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.build_request(Method::DELETE, uri)
    }

    /// Begin constructing a request with the given HTTP method and URI.
    pub fn build_request(&self, method: Method, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, method, self.target(uri))
    }

    fn target(&self, uri: &str) -> String {
        let path = if uri.starts_with('/') {
            uri.to_owned()
        } else {
            match uri.parse::<Uri>() {
                Ok(parsed) if parsed.scheme().is_some() => parsed
                    .path_and_query()
                    .map(|pq| pq.as_str().to_owned())
                    .unwrap_or_else(|| "/".to_owned()),
                _ => format!("/{}", uri),
            }
        };

        format!("http://{}{}", self.test_server.addr(), path)
    }

    fn perform(&self, request: Request<Body>) -> anyhow::Result<TestResponse> {
        let client = self.client.clone();

        self.test_server.run_request(async move {
            let response = client.request(request).await?;
            let (parts, body) = response.into_parts();
            let body = hyper::body::to_bytes(body).await?;
            Ok(TestResponse {
                response: Response::from_parts(parts, body.to_vec()),
            })
        })
    }
}

/// Wrapping struct for the `Response` returned by a `TestClient`. Provides access to the
/// `Response` value via the `Deref` trait, and also provides functions for reading the
/// response body, which has already been received in full.
///
/// # Examples
///
/// ```rust
/// # use hyper::{Body, Response, StatusCode};
/// # use roadway::helpers::http::response::create_response;
/// # use roadway::state::State;
/// # use roadway::test::TestServer;
/// #
/// # fn my_handler(state: State) -> (State, Response<Body>) {
/// #     let res = create_response(&state, StatusCode::OK, mime::TEXT_PLAIN, "This is the body content.");
/// #     (state, res)
/// # }
/// #
/// let test_server = TestServer::new(|| Ok(my_handler)).unwrap();
/// let response = test_server.client().get("/").perform().unwrap();
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.read_utf8_body().unwrap(), "This is the body content.");
/// ```
pub struct TestResponse {
    response: Response<Vec<u8>>,
}

impl Deref for TestResponse {
    type Target = Response<Vec<u8>>;

    fn deref(&self) -> &Response<Vec<u8>> {
        &self.response
    }
}

impl TestResponse {
    /// Returns the response body as bytes.
    pub fn read_body(self) -> anyhow::Result<Vec<u8>> {
        Ok(self.response.into_body())
    }

    /// Returns the response body as a UTF-8 string.
    pub fn read_utf8_body(self) -> anyhow::Result<String> {
        Ok(String::from_utf8(self.read_body()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, CONTENT_TYPE};
    use hyper::StatusCode;

    use crate::helpers::http::response::create_response;
    use crate::state::{FromState, State};

    fn echo(mut state: State) -> (State, Response<Body>) {
        let uri = Uri::borrow_from(&state).path().to_owned();
        let content_type = hyper::HeaderMap::<HeaderValue>::borrow_from(&state)
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("none")
            .to_owned();
        let _body = state.take::<Body>();

        let res = create_response(
            &state,
            StatusCode::OK,
            mime::TEXT_PLAIN,
            format!("{} {}", uri, content_type),
        );
        (state, res)
    }

    #[test]
    fn serves_requests_by_path_or_url() {
        let test_server = TestServer::new(|| Ok(echo)).unwrap();
        let client = test_server.client();

        let body = client.get("http://localhost/a//b").perform().unwrap();
        assert_eq!(body.read_utf8_body().unwrap(), "/a//b none");

        let body = client.get("http://localhost").perform().unwrap();
        assert_eq!(body.read_utf8_body().unwrap(), "/ none");

        let body = client.get("relative").perform().unwrap();
        assert_eq!(body.read_utf8_body().unwrap(), "/relative none");

        let body = client.get("relative//deeper").perform().unwrap();
        assert_eq!(body.read_utf8_body().unwrap(), "/relative//deeper none");
    }

    #[test]
    fn sends_bodies_and_headers() {
        let test_server = TestServer::new(|| Ok(echo)).unwrap();

        let response = test_server
            .client()
            .post("/upload", "data", mime::APPLICATION_JSON)
            .with_header(
                hyper::header::HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("abc"),
            )
            .perform()
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc");
        assert_eq!(response.read_utf8_body().unwrap(), "/upload application/json");
    }
}
