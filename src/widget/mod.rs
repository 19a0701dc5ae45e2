//! The chat widget.
//!
//! A [`ChatWidget`] owns one conversation: the [`Transcript`], the typing
//! flag, and a [`ChatView`] it renders into. It never performs I/O itself.
//! Submitting text yields an [`Outbound`] request that the caller hands to a
//! [`Responder`](crate::responder::Responder); the outcome is fed back
//! through [`ChatWidget::on_responder_settled`].
//!
//! # Example
//!
//! ```rust
//! use chat_widget::widget::{ChatBox, ChatWidget, ContentPolicy, Submission};
//!
//! let mut widget = ChatWidget::new(ChatBox::new(), ContentPolicy::Markup);
//! let Submission::Dispatch(outbound) = widget.submit("  Olá  ") else {
//!     panic!("expected a dispatch");
//! };
//! assert_eq!(outbound.text, "Olá");
//! assert!(widget.is_typing());
//!
//! widget.on_responder_settled(Ok("Oi! Como posso ajudar?".to_string()));
//! assert!(!widget.is_typing());
//! assert_eq!(widget.transcript().len(), 2);
//! ```

mod keyboard;
mod message;
mod render;
mod view;

pub use keyboard::{Key, KeyPress};
pub use message::{Message, Sender, Transcript};
pub use render::{
    ContentPolicy, INDICATOR_ID, escape_html, format_time, render_indicator, render_message,
};
pub use view::{ChatBox, ChatView, Node, Patch};

use tracing::{debug, warn};

use crate::responder::{FAILURE_TEXT, ResponderError};

/// Text the widget wants sent to the responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub text: String,
}

/// Why an input event did not produce a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// Input was empty after trimming.
    Empty,
    /// A reply is still outstanding.
    Busy,
    /// The key press does not send (e.g. Shift+Enter).
    NotSubmitKey,
}

/// Result of an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Dispatch(Outbound),
    Ignored(Ignored),
}

impl Submission {
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}

/// One conversation in one view.
#[derive(Debug)]
pub struct ChatWidget<V> {
    view: V,
    transcript: Transcript,
    typing: bool,
    policy: ContentPolicy,
}

impl<V: ChatView> ChatWidget<V> {
    /// Mount a widget on `view`.
    pub fn new(mut view: V, policy: ContentPolicy) -> Self {
        view.scroll_to_end();
        Self {
            view,
            transcript: Transcript::new(),
            typing: false,
            policy,
        }
    }

    /// Submit raw input text.
    ///
    /// The user message is appended and rendered before this returns, so it
    /// is always in the transcript before any network activity.
    pub fn submit(&mut self, raw_input: &str) -> Submission {
        let text = raw_input.trim();
        if text.is_empty() {
            return Submission::Ignored(Ignored::Empty);
        }
        if self.typing {
            debug!(name: "widget.submit.ignored", reason = "busy", "Reply outstanding, submission ignored");
            return Submission::Ignored(Ignored::Busy);
        }

        let message = Message::new(Sender::User, text);
        self.view.clear_input();
        self.append(message);

        self.typing = true;
        self.show_indicator();

        Submission::Dispatch(Outbound {
            text: text.to_string(),
        })
    }

    /// Submit whatever is currently in the view's input.
    pub fn submit_input(&mut self) -> Submission {
        let raw = self.view.input_value().to_string();
        self.submit(&raw)
    }

    /// Handle a key press on the input.
    pub fn on_key(&mut self, key: KeyPress) -> Submission {
        if !key.is_submit() {
            return Submission::Ignored(Ignored::NotSubmitKey);
        }
        self.submit_input()
    }

    /// Apply the outcome of the outstanding request.
    ///
    /// Returns `false` (and changes nothing) if no request was outstanding.
    pub fn on_responder_settled(&mut self, result: Result<String, ResponderError>) -> bool {
        if !self.typing {
            warn!(name: "widget.settle.unexpected", "Responder settled with no request outstanding");
            return false;
        }

        self.hide_indicator();
        let text = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(name: "widget.reply.failed", error = %e, "Failed to obtain reply");
                FAILURE_TEXT.to_string()
            }
        };
        self.append(Message::new(Sender::Bot, text));
        self.typing = false;
        true
    }

    /// Render a message into the view and scroll to it.
    pub fn render(&mut self, message: &Message) {
        self.view.append_node(render_message(message, self.policy));
        self.view.scroll_to_end();
    }

    /// Show the typing indicator unless it is already shown.
    pub fn show_indicator(&mut self) {
        if self.view.contains_node(INDICATOR_ID) {
            return;
        }
        self.view.append_node(render_indicator());
        self.view.scroll_to_end();
    }

    /// Remove the typing indicator if present.
    pub fn hide_indicator(&mut self) {
        self.view.remove_node(INDICATOR_ID);
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn policy(&self) -> ContentPolicy {
        self.policy
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn append(&mut self, message: Message) {
        self.render(&message);
        self.transcript.push(message);
    }
}
