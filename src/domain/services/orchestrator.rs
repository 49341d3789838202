#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Debounce;
use super::SessionManager;
use super::SessionStore;
use super::Throttle;
use crate::domain::models::Author;
use crate::domain::models::ChatError;
use crate::domain::models::Event;
use crate::domain::models::GatewayBox;
use crate::domain::models::Identity;
use crate::domain::models::LogLine;
use crate::domain::models::Message;
use crate::domain::models::MetricsSnapshot;
use crate::domain::models::Session;

pub const ASK_THROTTLE_WINDOW: Duration = Duration::from_millis(1000);
pub const PERSIST_QUIET_PERIOD: Duration = Duration::from_millis(500);
pub const NOTICE_TTL: Duration = Duration::from_secs(10);

/// A transient user-dismissible notification. Expires on its own after
/// [`NOTICE_TTL`].
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    created: Instant,
}

impl Notice {
    fn new(text: String) -> Notice {
        return Notice {
            text,
            created: Instant::now(),
        };
    }
}

/// Glues the session manager, inference gateway, store, and telemetry
/// channel together per user action, and owns all UI-facing state.
pub struct ChatOrchestrator {
    gateway: GatewayBox,
    store: SessionStore,
    identity: Option<Identity>,
    tx: mpsc::UnboundedSender<Event>,
    throttle: Throttle,
    persist: Debounce,
    pub sessions: Vec<Session>,
    pub current_id: String,
    pub metrics: MetricsSnapshot,
    pub log_lines: Vec<LogLine>,
    pub notices: Vec<Notice>,
    pub waiting_for_gateway: bool,
}

impl ChatOrchestrator {
    pub async fn new(
        gateway: GatewayBox,
        store: SessionStore,
        identity: Option<Identity>,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Result<ChatOrchestrator> {
        let mut sessions = match store.load().await {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to load persisted sessions");
                tx.send(Event::Notice(
                    ChatError::Storage(err.to_string()).to_string(),
                ))?;
                vec![]
            }
        };

        if sessions.is_empty() {
            sessions.push(SessionManager::create_session());
        }

        let current_id = sessions
            .iter()
            .max_by_key(|e| return e.timestamp)
            .map(|e| return e.id.to_string())
            .unwrap_or_default();

        return Ok(ChatOrchestrator {
            gateway,
            store,
            identity,
            tx,
            throttle: Throttle::new(ASK_THROTTLE_WINDOW),
            persist: Debounce::new(PERSIST_QUIET_PERIOD),
            sessions,
            current_id,
            metrics: MetricsSnapshot::default(),
            log_lines: vec![],
            notices: vec![],
            waiting_for_gateway: false,
        });
    }

    pub fn messages(&self) -> &[Message] {
        if let Some(session) = self.sessions.iter().find(|e| return e.id == self.current_id) {
            return &session.messages;
        }

        return &[];
    }

    /// Sends a prompt through the gateway and appends both the prompt and the
    /// outcome to the current session. Submissions inside the throttle window
    /// are dropped whole, appending nothing. Appends always follow submission
    /// order for a given session.
    pub async fn ask(&mut self, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(());
        }

        if !self.throttle.try_acquire() {
            tracing::debug!("Prompt dropped by the ask throttle");
            return Ok(());
        }

        let message = Message::new(Author::User, prompt);
        SessionManager::append_message(&self.current_id, message, &mut self.sessions);
        self.persist.poke();
        self.waiting_for_gateway = true;

        let res = self.gateway.ask(prompt, self.identity.as_ref()).await;
        self.waiting_for_gateway = false;

        match res {
            Ok(answer) => {
                let reply =
                    Message::new_with_markdown(Author::Assistant, &answer.text, answer.markdown);
                SessionManager::append_message(&self.current_id, reply, &mut self.sessions);
            }
            Err(err) => {
                tracing::error!(error = %err, "Inference request failed");
                let reply = Message::new(
                    Author::System,
                    &format!("The request failed with the following error: {err}"),
                );
                SessionManager::append_message(&self.current_id, reply, &mut self.sessions);
                self.tx.send(Event::Notice(err.to_string()))?;
            }
        }

        self.persist.poke();
        return Ok(());
    }

    /// Finalizes the outgoing session's title, then creates and switches to a
    /// fresh session.
    pub fn new_chat(&mut self) {
        if let Some(session) = self
            .sessions
            .iter_mut()
            .find(|e| return e.id == self.current_id)
        {
            if session.is_new && !session.messages.is_empty() {
                session.name = SessionManager::title_for(&session.messages);
                session.is_new = false;
            }
        }

        let session = SessionManager::create_session();
        let id = session.id.to_string();
        self.sessions.insert(0, session);

        let (current_id, _messages) = SessionManager::switch_to(&id, &mut self.sessions);
        self.current_id = current_id;
        self.persist.poke();
    }

    pub fn switch_chat(&mut self, session_id: &str) {
        let (current_id, _messages) = SessionManager::switch_to(session_id, &mut self.sessions);
        self.current_id = current_id;
    }

    pub fn delete_chat(&mut self, session_id: &str) {
        self.current_id =
            SessionManager::delete_session(session_id, &mut self.sessions, &self.current_id);
        self.persist.poke();
    }

    /// Folds background telemetry output and notices into display state.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::MetricsUpdated(snapshot) => {
                self.metrics = snapshot;
            }
            Event::LogsUpdated(lines) => {
                self.log_lines = lines;
            }
            Event::Notice(text) => {
                self.notices.push(Notice::new(text));
            }
        }

        self.expire_notices();
    }

    pub fn expire_notices(&mut self) {
        self.expire_notices_at(Instant::now());
    }

    fn expire_notices_at(&mut self, now: Instant) {
        self.notices
            .retain(|e| return now.duration_since(e.created) < NOTICE_TTL);
    }

    /// Persists the session image once the debounce quiet period has passed.
    /// Meant to be called from the host's tick loop.
    pub async fn flush(&mut self) -> Result<()> {
        if !self.persist.ready() {
            return Ok(());
        }

        return self.save().await;
    }

    /// Persists immediately, bypassing the debounce. For shutdown.
    pub async fn flush_now(&mut self) -> Result<()> {
        self.persist.clear();
        return self.save().await;
    }

    async fn save(&mut self) -> Result<()> {
        if let Err(err) = self.store.save(&self.sessions).await {
            tracing::error!(error = ?err, "Failed to persist sessions");
            self.tx.send(Event::Notice(
                ChatError::Storage(err.to_string()).to_string(),
            ))?;
        }

        return Ok(());
    }
}
