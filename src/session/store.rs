//! Widget session storage.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::driver::WidgetDriver;
use crate::responder::Responder;
use crate::widget::{ChatBox, ChatWidget, ContentPolicy};

/// Default idle time before a widget is dropped (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A mounted widget and its bookkeeping.
#[derive(Debug, Clone)]
pub struct WidgetSession {
    inner: Arc<WidgetSessionInner>,
}

#[derive(Debug)]
struct WidgetSessionInner {
    id: String,
    driver: WidgetDriver<ChatBox>,
    created_at: DateTime<Utc>,
    last_activity: std::sync::RwLock<DateTime<Utc>>,
}

impl WidgetSession {
    fn new(id: String, driver: WidgetDriver<ChatBox>) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(WidgetSessionInner {
                id,
                driver,
                created_at: now,
                last_activity: std::sync::RwLock::new(now),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn driver(&self) -> &WidgetDriver<ChatBox> {
        &self.inner.driver
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Record activity now.
    pub fn touch(&self) {
        if let Ok(mut guard) = self.inner.last_activity.write() {
            *guard = Utc::now();
        }
    }

    /// Check if the session has been idle longer than `timeout`.
    ///
    /// A widget waiting on a reply is never considered idle.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        if self.inner.driver.is_busy() {
            return false;
        }
        let Ok(last) = self.inner.last_activity.read().map(|g| *g) else {
            return false;
        };
        match (Utc::now() - last).to_std() {
            Ok(idle) => idle > timeout,
            // Negative duration means clock skew.
            Err(_) => false,
        }
    }
}

/// Store of mounted widgets, one per browser tab.
#[derive(Debug, Clone)]
pub struct WidgetSessions {
    inner: Arc<WidgetSessionsInner>,
}

#[derive(Debug)]
struct WidgetSessionsInner {
    sessions: RwLock<HashMap<String, WidgetSession>>,
    responder: Arc<dyn Responder>,
    policy: ContentPolicy,
}

impl WidgetSessions {
    /// Create a store whose widgets share `responder`.
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>, policy: ContentPolicy) -> Self {
        Self {
            inner: Arc::new(WidgetSessionsInner {
                sessions: RwLock::new(HashMap::new()),
                responder,
                policy,
            }),
        }
    }

    /// Mount a new widget and return its session.
    pub async fn create(&self) -> WidgetSession {
        let id = Uuid::new_v4().to_string();
        let widget = ChatWidget::new(ChatBox::new(), self.inner.policy);
        let driver = WidgetDriver::new(widget, Arc::clone(&self.inner.responder));
        let session = WidgetSession::new(id.clone(), driver);

        self.inner
            .sessions
            .write()
            .await
            .insert(id, session.clone());
        session
    }

    /// Get a session by ID, marking it active.
    pub async fn get(&self, id: &str) -> Option<WidgetSession> {
        let session = self.inner.sessions.read().await.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Unmount a widget.
    pub async fn remove(&self, id: &str) -> Option<WidgetSession> {
        self.inner.sessions.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove sessions that have been idle longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub async fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}
