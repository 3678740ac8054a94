//! A Hello World demo application for working with the roadway router.

use roadway::helpers::http::response::create_response;
use roadway::hyper::{Body, Response, StatusCode};
use roadway::router::builder::*;
use roadway::router::{vars, Router};
use roadway::state::State;

/// Responds with a fixed greeting.
pub fn say_hello(state: State) -> (State, Response<Body>) {
    let res = create_response(
        &state,
        StatusCode::OK,
        mime::TEXT_PLAIN,
        String::from("Hello World!"),
    );

    (state, res)
}

/// Greets whoever was named by the `{who}` path variable.
pub fn greet(state: State) -> (State, Response<Body>) {
    let who = vars(&state)
        .and_then(|vars| vars.get("who"))
        .cloned()
        .unwrap_or_default();

    let res = create_response(
        &state,
        StatusCode::OK,
        mime::TEXT_PLAIN,
        format!("Hello, {}!", who),
    );

    (state, res)
}

fn router() -> Router {
    build_router(|route| {
        route.get("/").to(say_hello);
        route.get("/hello/{who}").to(greet);
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
    use roadway::test::TestServer;

    #[test]
    fn receive_hello_world_response() {
        let test_server = TestServer::new(router()).unwrap();
        let response = test_server
            .client()
            .get("http://localhost")
            .perform()
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.read_body().unwrap();
        assert_eq!(&body[..], b"Hello World!");
    }

    #[test]
    fn receive_greeting_for_a_path_variable() {
        let test_server = TestServer::new(router()).unwrap();
        let response = test_server
            .client()
            .get("http://localhost//hello//gopher/")
            .perform()
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.read_utf8_body().unwrap(), "Hello, gopher!");
    }
}
