//! Widget sessions.
//!
//! Each browser tab mounts its own [`ChatWidget`](crate::widget::ChatWidget).
//! This module runs those widgets on the async runtime and keeps track of
//! them between requests.
//!
//! # Architecture
//!
//! - [`WidgetDriver`]: applies input events to one widget and runs its single
//!   outstanding responder call
//! - [`WidgetSessions`]: thread-safe store of mounted widgets with idle expiry
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_widget::session::{UiEvent, WidgetSessions};
//!
//! let sessions = WidgetSessions::new(responder, ContentPolicy::Markup);
//! let session = sessions.create().await;
//! session.driver().handle(UiEvent::Submit("Olá".into())).await;
//! session.driver().settled().await;
//! ```

mod driver;
mod store;

pub use driver::{UiEvent, WidgetDriver};
pub use store::{DEFAULT_IDLE_TIMEOUT, WidgetSession, WidgetSessions};
