#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::header;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use sof_extract::api::{create_router, AppState};
use sof_extract::config::{Config, LlmConfig, ServerConfig, SessionConfig, UploadsConfig};
use sof_extract::error::{Result, SofError};
use sof_extract::llm::CompletionModel;
use sof_extract::session::{InMemorySessionStore, SESSION_COOKIE};

pub const ARRIVED_RESPONSE: &str =
    r#"{"events": [{"event": "Arrived", "start_time": "2024-08-20 10:00", "end_time": null}]}"#;

/// Model double that replays scripted replies and counts calls.
///
/// The last reply repeats once the script runs out.
pub struct FakeModel {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn replying(body: &str) -> Arc<Self> {
        Self::sequence(vec![Ok(body.to_string())])
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::sequence(vec![Err(message.to_string())])
    }

    pub fn sequence(replies: Vec<std::result::Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for FakeModel {
    async fn complete_json(&self, _system_prompt: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply
            .unwrap_or_else(|| Err("no scripted reply".to_string()))
            .map_err(SofError::Llm)
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        llm: LlmConfig::new("test-key"),
        uploads: UploadsConfig::default(),
        session: SessionConfig::default(),
    }
}

pub fn test_state(model: Arc<FakeModel>) -> (AppState, Arc<InMemorySessionStore>) {
    test_state_with_config(test_config(), model)
}

pub fn test_state_with_config(
    config: Config,
    model: Arc<FakeModel>,
) -> (AppState, Arc<InMemorySessionStore>) {
    let sessions = Arc::new(InMemorySessionStore::new(config.session.capacity));
    let state = AppState::new(config, model, sessions.clone());
    (state, sessions)
}

pub async fn spawn_app(state: AppState) -> SocketAddr {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    addr
}

/// HTTP client that leaves redirects for the test to inspect.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::*;

    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

/// `name=value` pair from a `Set-Cookie` header, ready to send back.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Signed `Cookie` header value for a session id, as the server would issue it.
pub fn signed_session_cookie(state: &AppState, session_id: &str) -> String {
    let jar = SignedCookieJar::new(state.cookie_key.clone())
        .add(Cookie::new(SESSION_COOKIE, session_id.to_string()));
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("jar should emit a Set-Cookie header");
    cookie_pair(set_cookie)
}

/// Single-file `multipart/form-data` body and its content type.
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "sof-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
