//! Remote responder: the service that produces bot replies.
//!
//! The widget only knows a responder through the [`Responder`] trait. The
//! production implementation, [`HttpResponder`], posts `{"message": text}` to
//! a fixed URL and reads `{"response": text}` back.

mod http;

pub use http::HttpResponder;

use async_trait::async_trait;

/// Shown when the responder fails for any reason.
pub const FAILURE_TEXT: &str =
    "Desculpe, estou com problemas técnicos no momento. Tente novamente mais tarde.";

/// Shown when the responder answers without a `response` field.
pub const NOT_UNDERSTOOD_TEXT: &str = "Desculpe, não consegui entender sua pergunta.";

/// Errors that can occur while asking the responder for a reply.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The responder answered with a non-success status.
    #[error("responder returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not the expected JSON document.
    #[error("malformed responder body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Produces reply text for a single user message.
#[async_trait]
pub trait Responder: Send + Sync + std::fmt::Debug {
    /// Ask for a reply to `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable reply could be obtained.
    async fn respond(&self, text: &str) -> Result<String, ResponderError>;
}
