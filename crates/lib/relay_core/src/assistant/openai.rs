//! OpenAI Assistants API client.
//!
//! Talks to the `threads`, `messages` and `runs` endpoints of the
//! Assistants API (v2 beta header). No retries: every failure is returned
//! to the caller as-is.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::AssistantSettings;
use super::models::{MessageList, NewMessage, NewRun, Run, Thread, ThreadMessage};
use super::{AssistantApi, AssistantError};

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// reqwest-backed [`AssistantApi`] implementation.
#[derive(Clone, Debug)]
pub struct OpenAiAssistants {
    client: Client,
    settings: AssistantSettings,
}

impl OpenAiAssistants {
    pub fn new(settings: AssistantSettings) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| AssistantError::Transport(format!("HTTP client init failed: {e}")))?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.settings.api_key)
            .header(BETA_HEADER, BETA_VALUE)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, AssistantError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiErrorBody>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| AssistantError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssistantApi for OpenAiAssistants {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let thread: Thread =
            Self::send(self.request(Method::POST, "threads").json(&serde_json::json!({}))).await?;
        debug!(thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    async fn add_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        let path = format!("threads/{thread_id}/messages");
        let message: ThreadMessage = Self::send(self.request(Method::POST, &path).json(&NewMessage {
            role: "user",
            content: text,
        }))
        .await?;
        debug!(thread_id, message_id = %message.id, "message added");
        Ok(message)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        let path = format!("threads/{thread_id}/runs");
        Self::send(
            self.request(Method::POST, &path)
                .json(&NewRun { assistant_id }),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let path = format!("threads/{thread_id}/runs/{run_id}");
        Self::send(self.request(Method::GET, &path)).await
    }

    async fn latest_messages(
        &self,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let path = format!("threads/{thread_id}/messages");
        let list: MessageList = Self::send(
            self.request(Method::GET, &path)
                .query(&[("order", "desc"), ("limit", "1")]),
        )
        .await?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::assistant::RunStatus;

    /// Requests seen by the stub: (method + path, authorization, beta header, body).
    type Seen = Arc<Mutex<Vec<(String, String, String, Value)>>>;

    fn record(seen: &Seen, what: String, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        seen.lock()
            .unwrap()
            .push((what, header("authorization"), header("openai-beta"), body));
    }

    async fn spawn_stub() -> (String, Seen) {
        let seen: Seen = Arc::default();

        let app = Router::new()
            .route(
                "/v1/threads",
                post(|State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    record(&seen, "POST /threads".into(), &headers, body);
                    Json(json!({"id": "thread_1", "object": "thread"}))
                }),
            )
            .route(
                "/v1/threads/{thread_id}/messages",
                post(
                    |State(seen): State<Seen>,
                     Path(thread_id): Path<String>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        record(&seen, format!("POST /threads/{thread_id}/messages"), &headers, body);
                        Json(json!({"id": "msg_user", "role": "user", "content": []}))
                    },
                )
                .get(
                    |State(seen): State<Seen>,
                     Path(thread_id): Path<String>,
                     Query(query): Query<HashMap<String, String>>,
                     headers: HeaderMap| async move {
                        record(&seen, format!("GET /threads/{thread_id}/messages"), &headers, json!(query));
                        Json(json!({
                            "object": "list",
                            "data": [{
                                "id": "msg_reply",
                                "role": "assistant",
                                "content": [{"type": "text", "text": {"value": "hi there", "annotations": []}}]
                            }]
                        }))
                    },
                ),
            )
            .route(
                "/v1/threads/{thread_id}/runs",
                post(
                    |State(seen): State<Seen>,
                     Path(thread_id): Path<String>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        record(&seen, format!("POST /threads/{thread_id}/runs"), &headers, body);
                        Json(json!({"id": "run_1", "status": "queued"}))
                    },
                ),
            )
            .route(
                "/v1/threads/{thread_id}/runs/{run_id}",
                get(|Path((thread_id, run_id)): Path<(String, String)>| async move {
                    if run_id == "run_missing" {
                        return (
                            StatusCode::NOT_FOUND,
                            Json(json!({"error": {"message": "No run found", "type": "invalid_request_error"}})),
                        );
                    }
                    if thread_id == "thread_garbled" {
                        return (StatusCode::OK, Json(json!({"unexpected": true})));
                    }
                    (StatusCode::OK, Json(json!({"id": run_id, "status": "completed"})))
                }),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1"), seen)
    }

    fn client(api_base: String) -> OpenAiAssistants {
        let mut settings = AssistantSettings::new("sk-test");
        settings.api_base = api_base;
        OpenAiAssistants::new(settings).unwrap()
    }

    #[tokio::test]
    async fn sends_auth_and_beta_headers_with_expected_bodies() {
        let (base, seen) = spawn_stub().await;
        let api = client(base);

        let thread = api.create_thread().await.unwrap();
        assert_eq!(thread.id, "thread_1");
        api.add_message(&thread.id, "hello").await.unwrap();
        let run = api.create_run(&thread.id, "asst_1").await.unwrap();
        assert_eq!(run.status, RunStatus::Queued);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for (_, auth, beta, _) in seen.iter() {
            assert_eq!(auth, "Bearer sk-test");
            assert_eq!(beta, "assistants=v2");
        }
        assert_eq!(seen[0].0, "POST /threads");
        assert_eq!(seen[1].0, "POST /threads/thread_1/messages");
        assert_eq!(seen[1].3, json!({"role": "user", "content": "hello"}));
        assert_eq!(seen[2].0, "POST /threads/thread_1/runs");
        assert_eq!(seen[2].3, json!({"assistant_id": "asst_1"}));
    }

    #[tokio::test]
    async fn lists_newest_message_first() {
        let (base, seen) = spawn_stub().await;
        let api = client(base);

        let messages = api.latest_messages("thread_1").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].first_text(), Some("hi there"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].3, json!({"order": "desc", "limit": "1"}));
    }

    #[tokio::test]
    async fn retrieves_run_status() {
        let (base, _) = spawn_stub().await;
        let run = client(base).retrieve_run("thread_1", "run_1").await.unwrap();
        assert_eq!(run.id, "run_1");
        assert_eq!(run.status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let (base, _) = spawn_stub().await;
        let err = client(base)
            .retrieve_run("thread_1", "run_missing")
            .await
            .unwrap_err();
        match err {
            AssistantError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No run found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_shape_maps_to_decode_error() {
        let (base, _) = spawn_stub().await;
        let err = client(base)
            .retrieve_run("thread_garbled", "run_1")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/v1"))
            .create_thread()
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn url_joins_base_and_path() {
        let api = client("http://localhost:1/v1/".into());
        assert_eq!(api.url("threads"), "http://localhost:1/v1/threads");
    }
}
