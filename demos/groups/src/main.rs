//! Demonstrates route groups, layered middleware and the 404/405 fallback handlers.

use std::pin::Pin;

use futures_util::future::{self, FutureExt};
use log::info;
use roadway::handler::HandlerFuture;
use roadway::helpers::http::response::{create_empty_response, create_response};
use roadway::hyper::header::{HeaderMap, HeaderValue};
use roadway::hyper::{Body, Method, Response, StatusCode};
use roadway::middleware::Next;
use roadway::router::builder::*;
use roadway::router::non_match::RouteNonMatch;
use roadway::router::{vars, Router};
use roadway::state::{request_id, FromState, State};

const API_TOKEN: &str = "letmein";

fn access_log(state: State, next: Next) -> Pin<Box<HandlerFuture>> {
    info!("[{}] {}", request_id(&state), Method::borrow_from(&state));
    next(state)
}

fn require_token(state: State, next: Next) -> Pin<Box<HandlerFuture>> {
    let authorized = HeaderMap::<HeaderValue>::borrow_from(&state)
        .get("x-api-token")
        .map(|token| token == API_TOKEN)
        .unwrap_or(false);

    if authorized {
        next(state)
    } else {
        let res = create_empty_response(&state, StatusCode::UNAUTHORIZED);
        future::ok((state, res)).boxed()
    }
}

fn list_users(state: State) -> (State, Response<Body>) {
    let res = create_response(&state, StatusCode::OK, mime::APPLICATION_JSON, "[\"gopher\"]");
    (state, res)
}

fn show_user(state: State) -> (State, Response<Body>) {
    let id = vars(&state)
        .and_then(|vars| vars.get("id"))
        .cloned()
        .unwrap_or_default();
    let res = create_response(
        &state,
        StatusCode::OK,
        mime::APPLICATION_JSON,
        format!("{{\"id\":\"{}\"}}", id),
    );
    (state, res)
}

fn delete_user(state: State) -> (State, Response<Body>) {
    let res = create_empty_response(&state, StatusCode::NO_CONTENT);
    (state, res)
}

fn not_found(state: State) -> (State, Response<Body>) {
    let res = create_response(&state, StatusCode::NOT_FOUND, mime::TEXT_PLAIN, "nothing here");
    (state, res)
}

fn method_not_allowed(state: State) -> (State, Response<Body>) {
    let allowed = RouteNonMatch::try_borrow_from(&state)
        .map(|non_match| {
            non_match
                .allow()
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let res = create_response(
        &state,
        StatusCode::METHOD_NOT_ALLOWED,
        mime::TEXT_PLAIN,
        format!("try one of: {}", allowed),
    );
    (state, res)
}

fn router() -> Router {
    build_router(|route| {
        route.with_middleware(access_log);
        route.not_found(not_found);
        route.method_not_allowed(method_not_allowed);

        route.group("/api/v1", |api| {
            api.methods(&[Method::GET, Method::DELETE]);

            api.group("/users", |users| {
                users.get("").to(list_users);
                users.get("/{id}").to(show_user);
                users
                    .delete("/{id}")
                    .with_middleware(require_token)
                    .to(delete_user);
            });
        });
    })
}

/// Start a server and route each `Request` we receive.
pub fn main() {
    let addr = "127.0.0.1:7878";
    println!("Listening for requests at http://{}", addr);
    if let Err(e) = roadway::start(addr, router()) {
        eprintln!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadway::hyper::header::HeaderName;
    use roadway::test::TestServer;

    #[test]
    fn routes_within_nested_groups() {
        let test_server = TestServer::new(router()).unwrap();
        let client = test_server.client();

        let response = client.get("/api/v1/users").perform().unwrap();
        assert_eq!(response.read_utf8_body().unwrap(), "[\"gopher\"]");

        let response = client.get("/api/v1/users/42").perform().unwrap();
        assert_eq!(response.read_utf8_body().unwrap(), "{\"id\":\"42\"}");
    }

    #[test]
    fn route_middleware_guards_deletes() {
        let test_server = TestServer::new(router()).unwrap();
        let client = test_server.client();

        let response = client.delete("/api/v1/users/42").perform().unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = client
            .delete("/api/v1/users/42")
            .with_header(
                HeaderName::from_static("x-api-token"),
                HeaderValue::from_static(API_TOKEN),
            )
            .perform()
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn fallbacks_answer_unmatched_requests() {
        let test_server = TestServer::new(router()).unwrap();
        let client = test_server.client();

        let response = client.get("/api/v2").perform().unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.read_utf8_body().unwrap(), "nothing here");

        let response = client
            .post("/api/v1/users", "{}", mime::APPLICATION_JSON)
            .perform()
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.read_utf8_body().unwrap(),
            "try one of: DELETE, GET"
        );
    }
}
