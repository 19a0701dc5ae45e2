//! HTTP JSON responder.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{NOT_UNDERSTOOD_TEXT, Responder, ResponderError};

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    message: &'a str,
}

/// Responder backed by a single POST endpoint.
#[derive(Clone)]
pub struct HttpResponder {
    http: reqwest::Client,
    url: Url,
}

impl std::fmt::Debug for HttpResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponder")
            .field("url", &self.url.as_str())
            .finish()
    }
}

impl HttpResponder {
    /// Create a responder for `url` with no request timeout.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Create a responder whose requests fail after `timeout`.
    pub fn with_timeout(url: Url, timeout: Duration) -> Result<Self, ResponderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn respond(&self, text: &str) -> Result<String, ResponderError> {
        let resp = self
            .http
            .post(self.url.clone())
            .json(&ReplyRequest { message: text })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResponderError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;

        // Any JSON without a usable `response` string is a soft miss.
        Ok(body
            .get("response")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .map_or_else(|| NOT_UNDERSTOOD_TEXT.to_string(), str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    async fn serve(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/chat")).unwrap()
    }

    #[tokio::test]
    async fn test_reply_text_is_returned() {
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "response": format!("eco: {}", body["message"].as_str().unwrap()) }))
            }),
        );
        let responder = HttpResponder::new(serve(app).await);

        let reply = responder.respond("Hello").await.unwrap();
        assert_eq!(reply, "eco: Hello");
    }

    #[tokio::test]
    async fn test_missing_response_field_is_soft_fallback() {
        let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "entities": {} })) }));
        let responder = HttpResponder::new(serve(app).await);

        assert_eq!(responder.respond("?").await.unwrap(), NOT_UNDERSTOOD_TEXT);
    }

    #[tokio::test]
    async fn test_empty_response_field_is_soft_fallback() {
        let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "response": "" })) }));
        let responder = HttpResponder::new(serve(app).await);

        assert_eq!(responder.respond("?").await.unwrap(), NOT_UNDERSTOOD_TEXT);
    }

    #[tokio::test]
    async fn test_non_string_response_field_is_soft_fallback() {
        for body in [json!({ "response": 42 }), json!({ "response": { "x": 1 } }), json!([])] {
            let app = Router::new().route(
                "/api/chat",
                post(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            );
            let responder = HttpResponder::new(serve(app).await);

            assert_eq!(responder.respond("?").await.unwrap(), NOT_UNDERSTOOD_TEXT);
        }
    }

    #[tokio::test]
    async fn test_server_error_is_status_failure() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let responder = HttpResponder::new(serve(app).await);

        let err = responder.respond("oi").await.unwrap_err();
        assert!(matches!(err, ResponderError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_failure() {
        let app = Router::new().route("/api/chat", post(|| async { "not json" }));
        let responder = HttpResponder::new(serve(app).await);

        let err = responder.respond("oi").await.unwrap_err();
        assert!(matches!(err, ResponderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let responder = HttpResponder::new(Url::parse(&format!("http://{addr}/")).unwrap());
        let err = responder.respond("oi").await.unwrap_err();
        assert!(matches!(err, ResponderError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "response": "tarde demais" }))
            }),
        );
        let responder =
            HttpResponder::with_timeout(serve(app).await, Duration::from_millis(100)).unwrap();

        let err = responder.respond("oi").await.unwrap_err();
        assert!(matches!(err, ResponderError::Transport(e) if e.is_timeout()));
    }
}
