//! Async driver for a single widget.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::responder::Responder;
use crate::widget::{ChatView, ChatWidget, KeyPress, Submission};

/// Input events delivered to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The form was submitted with this input text.
    Submit(String),
    /// A key was pressed on the input.
    Key(KeyPress),
}

/// Runs one [`ChatWidget`] against a shared [`Responder`].
///
/// At most one responder task exists per driver: the widget refuses new
/// submissions until the outstanding one settles.
#[derive(Debug)]
pub struct WidgetDriver<V> {
    widget: Arc<Mutex<ChatWidget<V>>>,
    responder: Arc<dyn Responder>,
    busy: Arc<watch::Sender<bool>>,
}

impl<V> WidgetDriver<V>
where
    V: ChatView + Send + 'static,
{
    pub fn new(widget: ChatWidget<V>, responder: Arc<dyn Responder>) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            widget: Arc::new(Mutex::new(widget)),
            responder,
            busy: Arc::new(busy),
        }
    }

    /// Apply an input event.
    pub async fn handle(&self, event: UiEvent) -> Submission {
        self.handle_and(event, |_| ()).await.0
    }

    /// Apply an input event, then run `inspect` on the widget before any
    /// reply can be applied.
    pub async fn handle_and<T>(
        &self,
        event: UiEvent,
        inspect: impl FnOnce(&mut ChatWidget<V>) -> T,
    ) -> (Submission, T) {
        let mut widget = self.widget.lock().await;
        let submission = match event {
            UiEvent::Submit(raw) => widget.submit(&raw),
            UiEvent::Key(key) => widget.on_key(key),
        };

        if let Submission::Dispatch(outbound) = &submission {
            self.busy.send_replace(true);
            self.spawn_reply(outbound.text.clone());
        }

        let inspected = inspect(&mut widget);
        (submission, inspected)
    }

    /// Wait until no reply is outstanding.
    pub async fn settled(&self) {
        let mut rx = self.busy.subscribe();
        // The sender lives as long as `self`.
        let _ = rx.wait_for(|busy| !*busy).await;
    }

    /// Run `f` on the widget.
    pub async fn inspect<T>(&self, f: impl FnOnce(&mut ChatWidget<V>) -> T) -> T {
        let mut widget = self.widget.lock().await;
        f(&mut widget)
    }

    /// Whether a reply is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    fn spawn_reply(&self, text: String) {
        let widget = Arc::clone(&self.widget);
        let responder = Arc::clone(&self.responder);
        let busy = Arc::clone(&self.busy);

        tokio::spawn(async move {
            let result = responder.respond(&text).await;
            match &result {
                Ok(_) => info!(name: "responder.request.completed", "Reply received"),
                Err(e) => warn!(name: "responder.request.failed", error = %e, "Responder failed"),
            }

            // Cleared under the lock so a new submit cannot slip in between.
            let mut widget = widget.lock().await;
            widget.on_responder_settled(result);
            busy.send_replace(false);
        });
    }
}
