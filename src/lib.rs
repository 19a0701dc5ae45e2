//! Chat widget with a server-hosted transcript.
//!
//! A browser tab mounts a [`widget::ChatWidget`] on the server and drives it
//! over HTMX form posts. Each message is forwarded to a remote responder over
//! a small JSON protocol; the crate also ships that responder, a directory of
//! public health centres.
//!
//! # Architecture
//!
//! - **Widget**: transcript, typing indicator, rendering and keyboard contract
//! - **Responder**: `POST {"message"}` → `{"response"}` client
//! - **Sessions**: one widget per tab, one outstanding reply per widget
//! - **Server**: Axum routes for the page, widget fragments and the directory API
//!
//! # Modules
//!
//! - [`widget`]: the chat widget state machine and its view seam
//! - [`responder`]: responder trait and HTTP implementation
//! - [`session`]: async driver and per-tab session store
//! - [`directory`]: health-centre lookup behind `/api/chat`
//! - [`server`]: HTTP surface
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod directory;
pub mod responder;
pub mod server;
pub mod session;
pub mod widget;

use crate::config::AppConfig;

use directory::Directory;
use session::WidgetSessions;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Mounted widgets.
    pub sessions: WidgetSessions,
    /// Health-centre directory, when the responder API is served here.
    pub directory: Option<Arc<Directory>>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
