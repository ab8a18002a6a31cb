use super::*;
use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

fn b64(text: &str) -> Option<String> {
    Some(STANDARD.encode(text))
}

fn status(description: &str) -> Option<SubmissionStatus> {
    Some(SubmissionStatus {
        description: Some(description.to_string()),
    })
}

#[test]
fn language_id_table_is_closed_and_case_insensitive() {
    assert_eq!(sandbox_language_id("python"), Some(71));
    assert_eq!(sandbox_language_id("Java"), Some(62));
    assert_eq!(sandbox_language_id("C"), Some(50));
    assert_eq!(sandbox_language_id("rust"), None);
    assert_eq!(sandbox_language_id(""), None);
}

#[test]
fn stdout_takes_precedence_over_everything() {
    let response = SubmissionResponse {
        stdout: b64("42\n"),
        stderr: b64("warning: noise"),
        compile_output: b64("diagnostic"),
        message: b64("system"),
        status: status("Accepted"),
    };
    assert_eq!(response.into_display_output().expect("output"), "42\n");
}

#[test]
fn stderr_surfaces_when_stdout_is_absent() {
    let response = SubmissionResponse {
        stderr: b64("division by zero"),
        compile_output: b64("diagnostic"),
        ..SubmissionResponse::default()
    };
    assert_eq!(
        response.into_display_output().expect("output"),
        "Error: division by zero"
    );
}

#[test]
fn compile_output_surfaces_ahead_of_generic_status() {
    let response = SubmissionResponse {
        compile_output: b64("main.c:3: expected ';'"),
        status: status("Compilation Error"),
        ..SubmissionResponse::default()
    };
    assert_eq!(
        response.into_display_output().expect("output"),
        "Compilation Error:\nmain.c:3: expected ';'"
    );
}

#[test]
fn empty_stdout_falls_through_to_the_next_branch() {
    let response = SubmissionResponse {
        stdout: Some(String::new()),
        stderr: b64("boom"),
        ..SubmissionResponse::default()
    };
    assert_eq!(
        response.into_display_output().expect("output"),
        "Error: boom"
    );
}

#[test]
fn system_message_surfaces_before_status_description() {
    let response = SubmissionResponse {
        message: b64("queue is full"),
        status: status("Processing"),
        ..SubmissionResponse::default()
    };
    assert_eq!(
        response.into_display_output().expect("output"),
        "System Message: queue is full"
    );
}

#[test]
fn status_description_is_the_penultimate_fallback() {
    let response = SubmissionResponse {
        status: status("Time Limit Exceeded"),
        ..SubmissionResponse::default()
    };
    assert_eq!(
        response.into_display_output().expect("output"),
        "Time Limit Exceeded"
    );
}

#[test]
fn fully_empty_response_yields_the_fixed_no_output_text() {
    let response = SubmissionResponse::default();
    assert_eq!(
        response.into_display_output().expect("output"),
        NO_OUTPUT_MESSAGE
    );
}

#[test]
fn undecodable_fields_are_malformed_responses() {
    let response = SubmissionResponse {
        stdout: Some("%%% not base64 %%%".to_string()),
        ..SubmissionResponse::default()
    };
    assert!(matches!(
        response.into_display_output(),
        Err(SandboxError::MalformedResponse(_))
    ));
}

fn settings_for(sandbox_base_url: &str) -> Settings {
    Settings {
        sandbox_base_url: sandbox_base_url.to_string(),
        ..Settings::default()
    }
}

#[tokio::test]
async fn unsupported_language_fails_before_any_network_io() {
    // Nothing is listening on this address; reaching it would error with a
    // transport failure instead of the unsupported-language condition.
    let client = SandboxClient::new(&settings_for("http://127.0.0.1:9"));

    let err = client
        .execute("fn main() {}", "Rust", "")
        .await
        .expect_err("must fail");
    match err {
        SandboxError::UnsupportedLanguage(tag) => assert_eq!(tag, "Rust"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn transport_failure_is_unreachable() {
    let client = SandboxClient::new(&settings_for("http://127.0.0.1:9"));

    let err = client
        .execute("print(1)", "python", "")
        .await
        .expect_err("must fail");
    assert!(matches!(err, SandboxError::Unreachable(_)));
}

#[derive(Debug)]
struct CapturedSubmission {
    query: HashMap<String, String>,
    body: SubmissionRequest,
}

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedSubmission>>>>,
    reply: serde_json::Value,
}

async fn handle_submission(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<SubmissionRequest>,
) -> Json<serde_json::Value> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(CapturedSubmission { query, body });
    }
    Json(state.reply.clone())
}

async fn spawn_sandbox_server(
    reply: serde_json::Value,
) -> (String, oneshot::Receiver<CapturedSubmission>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        reply,
    };
    let app = Router::new()
        .route("/submissions", post(handle_submission))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

#[tokio::test]
async fn submits_base64_payload_in_synchronous_wait_mode() {
    let reply = serde_json::json!({
        "stdout": STANDARD.encode("hello softvibe\n"),
        "status": { "id": 3, "description": "Accepted" }
    });
    let (server_url, payload_rx) = spawn_sandbox_server(reply).await;
    let client = SandboxClient::new(&settings_for(&server_url));

    let output = client
        .execute("print(\"hello softvibe\")", "python", "42\n")
        .await
        .expect("execute");
    assert_eq!(output, "hello softvibe\n");

    let captured = payload_rx.await.expect("captured submission");
    assert_eq!(
        captured.query.get("base64_encoded").map(String::as_str),
        Some("true")
    );
    assert_eq!(captured.query.get("wait").map(String::as_str), Some("true"));
    assert_eq!(captured.body.language_id, 71);
    assert_eq!(
        captured.body.source_code,
        STANDARD.encode("print(\"hello softvibe\")")
    );
    assert_eq!(captured.body.stdin, STANDARD.encode("42\n"));
}

#[tokio::test]
async fn stderr_only_response_is_marked_as_an_error() {
    let reply = serde_json::json!({
        "stdout": null,
        "stderr": STANDARD.encode("NameError: name 'x' is not defined"),
        "status": { "id": 11, "description": "Runtime Error (NZEC)" }
    });
    let (server_url, _payload_rx) = spawn_sandbox_server(reply).await;
    let client = SandboxClient::new(&settings_for(&server_url));

    let output = client.execute("print(x)", "python", "").await.expect("execute");
    assert_eq!(output, "Error: NameError: name 'x' is not defined");
}
