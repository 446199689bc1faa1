//! Mock Straico backend for integration tests
//!
//! Serves the v1 and v0 endpoints with canned enveloped responses and
//! records every request it receives

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, for JSON requests
    pub json: Option<Value>,
    /// Uploaded part, for multipart requests
    pub upload: Option<Upload>,
}

/// Single multipart part received by the upload endpoint
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fixed reply overriding the canned responses
#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
}

struct MockState {
    requests: Mutex<Vec<Recorded>>,
    canned: Option<Canned>,
}

/// Mock Straico server bound to an ephemeral local port
pub struct MockStraico {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockStraico {
    /// Start a mock serving realistic enveloped responses
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    /// Start a mock that answers every request with `body` and `status`
    pub async fn start_with_body(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some(Canned {
            status: StatusCode::from_u16(status)?,
            body: body.to_owned(),
        }))
        .await
    }

    async fn start_inner(canned: Option<Canned>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            canned,
        });

        let app = Router::new()
            .route("/v1/models", routing::get(handle_models))
            .route("/v1/prompt/completion", routing::post(handle_completion))
            .route("/v0/file/upload", routing::post(handle_upload))
            .route("/v0/image/generation", routing::post(handle_image_generation))
            .fallback(handle_unknown)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including the `/v1` prefix, as configured in production
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Scheme and host only
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("mock received no requests")
    }
}

impl Drop for MockStraico {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Recording --

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn record(
    state: &MockState,
    method: &str,
    path: &str,
    headers: &HeaderMap,
    json: Option<Value>,
    upload: Option<Upload>,
) {
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_owned(),
        path: path.to_owned(),
        authorization: header_value(headers, header::AUTHORIZATION),
        accept: header_value(headers, header::ACCEPT),
        content_type: header_value(headers, header::CONTENT_TYPE),
        json,
        upload,
    });
}

/// Reply with the canned body if one is set, otherwise with `fallback`
fn reply(state: &MockState, fallback: Value) -> Response {
    match &state.canned {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, "application/json")],
            canned.body.clone(),
        )
            .into_response(),
        None => Json(fallback).into_response(),
    }
}

// -- Handlers --

async fn handle_models(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/v1/models", &headers, None, None);

    reply(
        &state,
        json!({
            "success": true,
            "data": {
                "chat": [
                    {
                        "name": "OpenAI: GPT-4o mini",
                        "model": "openai/gpt-4o-mini",
                        "word_limit": 96000,
                        "max_output": 16384
                    },
                    {
                        "name": "Anthropic: Claude 3 Haiku",
                        "model": "anthropic/claude-3-haiku:beta",
                        "word_limit": 150000,
                        "max_output": 4096
                    }
                ],
                "image": [
                    {"name": "OpenAI: Dall-E 3", "model": "openai/dall-e-3"}
                ]
            }
        }),
    )
}

async fn handle_completion(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let models: Vec<Value> = body["models"].as_array().cloned().unwrap_or_default();
    let message = body["message"].as_str().unwrap_or_default().to_owned();
    record(&state, "POST", "/v1/prompt/completion", &headers, Some(body), None);

    let completions: serde_json::Map<String, Value> = models
        .iter()
        .filter_map(Value::as_str)
        .map(|model| {
            (
                model.to_owned(),
                json!({
                    "completion": {
                        "choices": [{
                            "message": {"role": "assistant", "content": format!("echo: {message}")}
                        }]
                    },
                    "price": {"input": 0.5, "output": 1.0, "total": 1.5}
                }),
            )
        })
        .collect();

    reply(
        &state,
        json!({
            "success": true,
            "data": {
                "overall_price": {"input": 0.5, "output": 1.0, "total": 1.5},
                "completions": completions
            }
        }),
    )
}

async fn handle_upload(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();

        upload = Some(Upload {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    let url = format!(
        "https://prompt-rack.s3.amazonaws.com/api/{}",
        upload
            .as_ref()
            .and_then(|u| u.file_name.clone())
            .unwrap_or_default()
    );
    record(&state, "POST", "/v0/file/upload", &headers, None, upload);

    reply(&state, json!({"success": true, "data": {"url": url}}))
}

async fn handle_image_generation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let variations = body["variations"].as_u64().unwrap_or(1);
    record(&state, "POST", "/v0/image/generation", &headers, Some(body), None);

    let images: Vec<String> = (0..variations)
        .map(|i| format!("https://prompt-rack.s3.amazonaws.com/images/{i}.png"))
        .collect();

    reply(
        &state,
        json!({
            "success": true,
            "data": {
                "zip": "https://prompt-rack.s3.amazonaws.com/images/all.zip",
                "images": images,
                "price": {
                    "price_per_image": 120,
                    "quantity_images": variations,
                    "total": 120 * variations
                }
            }
        }),
    )
}

async fn handle_unknown(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    record(&state, &method, &path, request.headers(), None, None);

    let body = json!({"success": false, "message": format!("no route for {path}")});
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
