use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use gaia_brain::{responder, Assistant};
use gaia_core::config::Config;
use gaia_core::error::{GaiaError, Result};
use gaia_core::types::IncomingMessage;
use gaia_telegram::bot::TelegramBot;
use gaia_telegram::types::Update;
use serde_json::{json, Value};

pub struct WebhookState {
    pub config: Config,
    pub assistant: Assistant,
    pub bot: TelegramBot,
}

fn ack() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "ok": true })))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": "gaia", "status": "listening" }))
}

/// Handle one Telegram update. Anything that was received is acknowledged with
/// 200 so Telegram does not redeliver it; only missing configuration yields 500.
async fn receive_update(
    State(state): State<Arc<WebhookState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable update");
            return ack();
        }
    };

    let Some((chat_id, text)) = update.chat_and_text() else {
        tracing::debug!(update_id = update.update_id, "update has no text message");
        return ack();
    };

    if let Err(e) = state.config.validate() {
        tracing::error!(error = %e, "webhook called without required configuration");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": e.to_string() })),
        );
    }

    let message = IncomingMessage {
        chat_id,
        text: text.to_string(),
    };
    let outbound = state.assistant.handle(&message).await;
    responder::dispatch(&state.bot, &outbound).await;

    ack()
}

/// Routes: `GET` health and `POST` update on the configured webhook path.
pub fn router(state: Arc<WebhookState>) -> Result<Router> {
    state.config.server.check_webhook_path()?;
    let path = state.config.server.webhook_path.clone();
    Ok(Router::new()
        .route(&path, get(health).post(receive_update))
        .with_state(state))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: Arc<WebhookState>) -> Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = router(state)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GaiaError::Server(format!("failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "webhook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GaiaError::Server(format!("webhook server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use gaia_brain::source::{ProfileSource, TriggerSource};
    use gaia_core::types::*;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Rules;

    #[async_trait]
    impl TriggerSource for Rules {
        async fn enabled_triggers(&self) -> Result<Vec<Trigger>> {
            Ok(vec![Trigger {
                id: "greet".to_string(),
                keywords: vec!["oi".to_string(), "ola".to_string()],
                is_enabled: true,
                action_type: ActionType::Greeting,
                response_text: "Hello!".to_string(),
                response_buttons: Some(vec![ButtonTemplate {
                    label: "Book".to_string(),
                    url_template: "https://x".to_string(),
                }]),
                created_at: 0,
            }])
        }
    }

    #[async_trait]
    impl ProfileSource for Rules {
        async fn profile(&self, _profile_id: &str) -> Result<Option<StudioProfile>> {
            Ok(None)
        }
    }

    fn state(api_base: &str, token: &str) -> WebhookState {
        let mut config = Config::default();
        config.telegram.token = token.to_string();
        WebhookState {
            assistant: Assistant::new(Arc::new(Rules), Arc::new(Rules), &config),
            bot: TelegramBot::with_api_base(api_base, token),
            config,
        }
    }

    fn app(api_base: &str, token: &str) -> Router {
        router(Arc::new(state(api_base, token))).unwrap()
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_of(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app("http://127.0.0.1:9", "123:abc")
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await["ok"], true);
    }

    #[tokio::test]
    async fn test_update_is_answered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({
                "chat_id": 42,
                "text": "Hello!",
                "reply_markup": {"inline_keyboard": [[{"text": "Book", "url": "https://x"}]]},
                "parse_mode": "Markdown",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server.uri(), "123:abc")
            .oneshot(post(
                r#"{"update_id":1,"message":{"message_id":5,"chat":{"id":42},"text":"Ola, bom dia"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_edited_message_is_answered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server.uri(), "123:abc")
            .oneshot(post(
                r#"{"update_id":2,"edited_message":{"message_id":5,"chat":{"id":42},"text":"oi"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_transport_failure_still_acknowledged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "description": "Bad Request: can't parse entities"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server.uri(), "123:abc")
            .oneshot(post(
                r#"{"update_id":3,"message":{"message_id":5,"chat":{"id":42},"text":"ola"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_malformed_payloads_are_acknowledged_silently() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        for body in [
            "not json",
            r#"{"update_id":4}"#,
            r#"{"update_id":5,"message":{"message_id":5,"chat":{"id":42}}}"#,
            r#"{"update_id":6,"message":{"message_id":5,"text":"ola"}}"#,
        ] {
            let response = app(&server.uri(), "123:abc")
                .oneshot(post(body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        let response = app(&server.uri(), "")
            .oneshot(post(
                r#"{"update_id":7,"message":{"message_id":5,"chat":{"id":42},"text":"ola"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["ok"], false);
    }

    #[test]
    fn test_relative_webhook_path_is_config_error() {
        let mut state = state("http://127.0.0.1:9", "123:abc");
        state.config.server.webhook_path = "webhook".to_string();
        assert!(matches!(
            router(Arc::new(state)),
            Err(GaiaError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_webhook_path() {
        let mut state = state("http://127.0.0.1:9", "123:abc");
        state.config.server.webhook_path = "/telegram/gaia".to_string();
        let app = router(Arc::new(state)).unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/telegram/gaia")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
