//! Directory API: the responder protocol served by this binary.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::directory::Directory;

const INVALID_REQUEST_TEXT: &str = "Requisição inválida. Esperado campo \"message\".";
const EMPTY_MESSAGE_TEXT: &str = "A mensagem está vazia.";

/// Build the `/api` router.
pub fn router() -> Router<Arc<Directory>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
}

/// Request body for the chat API.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<Value>,
}

fn bad_request(text: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": text }))).into_response()
}

/// POST /api/chat - Answer a question about health centres.
async fn chat(
    State(directory): State<Arc<Directory>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(ChatRequest {
            message: Some(Value::String(message)),
        })) => message,
        Ok(_) => return bad_request(INVALID_REQUEST_TEXT),
        Err(rejection) => {
            warn!(name: "api.chat.rejected", error = %rejection, "Malformed chat request");
            return bad_request(INVALID_REQUEST_TEXT);
        }
    };

    let question = message.trim();
    if question.is_empty() {
        return bad_request(EMPTY_MESSAGE_TEXT);
    }

    let answer = directory.answer(question);
    info!(
        name: "api.chat.answered",
        centers = answer.center_info.as_ref().map_or(0, Vec::len),
        "Question answered"
    );
    Json(answer).into_response()
}

/// GET /api/health
async fn health(State(directory): State<Arc<Directory>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "details": {
            "directory": "active",
            "centers": directory.len(),
        }
    }))
}
