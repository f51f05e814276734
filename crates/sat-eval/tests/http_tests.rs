//! `UreqClient` against a local tiny_http server.

use std::sync::Arc;
use std::thread;

use sat_eval::{Evaluator, HttpClient, HttpError, UreqClient};
use sat_lexer::lex;
use sat_parser::parse;
use sat_types::{Config, ErrorCode, HealthcheckConfig};

/// Serves canned `(status, body)` replies keyed by path. Unknown paths get
/// a 404.
struct MockServer {
    port: u16,
    _handle: thread::JoinHandle<()>,
}

impl MockServer {
    fn start(routes: Vec<(&'static str, u16, &'static str)>) -> Self {
        let server =
            Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("failed to bind mock server"));
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = thread::spawn(move || loop {
            let Ok(request) = server.recv() else {
                break;
            };
            let (status, body) = routes
                .iter()
                .find(|(path, _, _)| *path == request.url())
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, "not found"));
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        });
        Self {
            port,
            _handle: handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

#[test]
fn test_ureq_client_ok_response() {
    let server = MockServer::start(vec![("/ping", 200, "pong")]);
    let response = UreqClient::new().get(&server.url("/ping")).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "pong");
}

#[test]
fn test_ureq_client_error_status_is_a_response() {
    let server = MockServer::start(vec![("/boom", 500, "exploded")]);
    let client = UreqClient::new();

    let response = client.get(&server.url("/boom")).unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.body, "exploded");

    let response = client.get(&server.url("/elsewhere")).unwrap();
    assert_eq!(response.status, 404);
}

#[test]
fn test_ureq_client_transport_error() {
    // Bind and drop a server to get a port nobody listens on.
    let port = {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let err = UreqClient::new()
        .get(&format!("http://127.0.0.1:{port}/"))
        .unwrap_err();
    assert!(matches!(err, HttpError::Transport { .. }));
}

#[test]
fn test_get_and_healthcheck_end_to_end() {
    let server = MockServer::start(vec![
        ("/health", 200, "ok"),
        ("/users/1", 200, r#"{"id": 1, "name": "sam", "roles": ["admin"]}"#),
    ]);
    let source = format!(
        r#"healthcheck: "{health}"
test "user" {{
  status, user = get: "{user}"
  assert: status == 200
  assert: user.name == "sam"
  assert: user.roles.0 == "admin"
}}"#,
        health = server.url("/health"),
        user = server.url("/users/1"),
    );
    let config = Config::default();
    let program = parse(lex("api.sat", &source).unwrap(), &config).unwrap();
    let feedback = Evaluator::new(&config).run(program).unwrap();
    assert!(feedback.is_success(), "{feedback}");
    assert_eq!(feedback.render(), "\t✓\tuser");
}

#[test]
fn test_healthcheck_times_out_on_non_200() {
    let server = MockServer::start(vec![("/health", 503, "starting")]);
    let source = format!("healthcheck: \"{}\"", server.url("/health"));
    let config = Config {
        healthcheck: HealthcheckConfig {
            interval_ms: 1,
            max_attempts: 3,
        },
        ..Config::default()
    };
    let program = parse(lex("api.sat", &source).unwrap(), &config).unwrap();
    let err = Evaluator::new(&config).run(program).unwrap_err();
    assert_eq!(err.code, ErrorCode::HEALTHCHECK_TIMEOUT);
}
