//! Widget endpoints.
//!
//! The browser never holds conversation state: each endpoint applies an event
//! to the server-side widget and answers with the HTML produced by the view
//! patches it recorded.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info};

use super::page::{chat_content, html_shell};
use crate::AppState;
use crate::session::UiEvent;
use crate::widget::{Patch, Submission};

/// GET / - Mount a widget and serve the chat page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create().await;
    info!(name: "widget.mounted", widget_id = %session.id(), "Widget mounted");
    Html(html_shell("Centros de Saúde BH", &chat_content(session.id())))
}

/// Form body posted by `#chat-form`.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    message: String,
}

/// POST /widget/{id}/submit - Submit the input.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SubmitForm>,
) -> Response {
    let Some(session) = state.sessions.get(&id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let (submission, patches) = session
        .driver()
        .handle_and(UiEvent::Submit(form.message), |w| {
            w.view_mut().take_patches()
        })
        .await;

    match submission {
        Submission::Dispatch(_) => {
            debug!(name: "widget.submit.dispatched", widget_id = %id, "Message dispatched");
            let mut html = render_patches(&patches);
            html.push_str(&reply_poller(&id));
            Html(html).into_response()
        }
        Submission::Ignored(reason) => {
            debug!(name: "widget.submit.ignored", widget_id = %id, reason = ?reason, "Submission ignored");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// GET /widget/{id}/reply - Wait for the outstanding reply.
pub async fn reply(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(session) = state.sessions.get(&id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    session.driver().settled().await;
    let patches = session
        .driver()
        .inspect(|w| w.view_mut().take_patches())
        .await;
    Html(render_patches(&patches)).into_response()
}

/// POST /widget/{id}/close - Unmount the widget.
pub async fn close(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id).await.is_some() {
        info!(name: "widget.unmounted", widget_id = %id, "Widget unmounted");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Element that fetches the reply once swapped in, then replaces itself.
fn reply_poller(id: &str) -> String {
    format!(
        r#"<div class="reply-poller" hx-get="/widget/{id}/reply" hx-trigger="load" hx-swap="outerHTML scroll:#chat-box:bottom"></div>"#
    )
}

/// Turn view patches into an HTMX response body.
///
/// Appended nodes are emitted in order; removals become out-of-band deletes.
/// Input clearing and scrolling are handled by the form's own attributes.
pub fn render_patches(patches: &[Patch]) -> String {
    let mut html = String::new();
    for patch in patches {
        match patch {
            Patch::Append(node) => html.push_str(&node.html),
            Patch::Remove(id) => {
                html.push_str(&format!(r#"<div id="{id}" hx-swap-oob="delete"></div>"#));
            }
            Patch::ClearInput | Patch::ScrollToEnd => {}
        }
    }
    html
}
