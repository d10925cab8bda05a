#![cfg(unix)]

use expectrl::{Eof, Error as ExpectError, Session};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPECT_TIMEOUT: Duration = Duration::from_secs(4);
const EXPECT_RETRIES: usize = 3;

#[test]
fn repl_shows_input_prompt_and_exits_on_command() {
    let (mut session, _home) = spawn_app("http://127.0.0.1:9");
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "/exit");
    session.expect(Eof).expect("process exits");
}

#[test]
fn repl_answers_then_prompts_again() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello model"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"candidates": [{"finishReason": "STOP", "content": {"parts": [{"text": "Mock model says hello"}]}}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
    });

    let (mut session, _home) = spawn_app(&server.uri());
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "hello model");
    expect_text(&mut session, "Mock model says hello");
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "/unknown");
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "/exit");
    session.expect(Eof).expect("process exits");
    rt.block_on(server.verify());
}

#[test]
fn repl_reports_missing_file_and_stays_interactive() {
    let (mut session, _home) = spawn_app("http://127.0.0.1:9");
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "/file does-not-exist.txt");
    expect_text(&mut session, "File not found. ");
    expect_text(&mut session, "Input: ");
    submit_line(&mut session, "/exit");
    session.expect(Eof).expect("process exits");
}

#[test]
fn ctrl_c_says_goodbye() {
    let (mut session, _home) = spawn_app("http://127.0.0.1:9");
    expect_text(&mut session, "Input: ");
    session.send([0x03u8]).expect("send Ctrl-C");
    expect_text(&mut session, "Bye... ");
    session.expect(Eof).expect("process exits");
}

fn spawn_app(base_url: &str) -> (Session, TempDir) {
    let home = tempfile::tempdir().expect("sandbox tempdir");

    let mut command = Command::new(env!("CARGO_BIN_EXE_gemini-chat"));
    command
        .current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("GOOGLE_API_KEY", "test-key")
        .env("GEMINI_MODEL", "gemini-test")
        .env("GEMINI_BASE_URL", base_url);

    let mut session = Session::spawn(command).expect("spawn gemini-chat in PTY");
    session.set_expect_timeout(Some(EXPECT_TIMEOUT));
    (session, home)
}

fn submit_line(session: &mut Session, line: &str) {
    session.send(line).expect("send line text");
    session.send([b'\r']).expect("send Enter");
}

fn expect_text(session: &mut Session, text: &str) {
    for attempt in 1..=EXPECT_RETRIES {
        match session.expect(text) {
            Ok(_) => return,
            Err(ExpectError::ExpectTimeout) if attempt < EXPECT_RETRIES => continue,
            Err(err) => panic!(
                "failed to match text {:?} on attempt {}: {}",
                text, attempt, err
            ),
        }
    }

    panic!("unreachable: retries exhausted without returning");
}
