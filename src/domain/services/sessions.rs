#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::DEFAULT_SESSION_NAME;

pub const TITLE_MAX_CHARS: usize = 40;

/// Stateless operations over a session list. The caller owns the list and the
/// current-session pointer. Every operation is total: unknown or corrupt ids
/// self-heal by falling back to session creation so chat continuity is never
/// blocked.
pub struct SessionManager {}

impl SessionManager {
    pub fn create_session() -> Session {
        return Session::new();
    }

    /// Makes `session_id` current and returns its messages. An unknown id is
    /// a recoverable inconsistency: any stale entry is superseded by a fresh
    /// session inserted at the front of the list.
    pub fn switch_to(session_id: &str, sessions: &mut Vec<Session>) -> (String, Vec<Message>) {
        if let Some(session) = sessions.iter().find(|e| return e.id == session_id) {
            return (session.id.to_string(), session.messages.clone());
        }

        tracing::warn!(
            session_id = session_id,
            "No session found for id, creating a fresh one"
        );

        sessions.retain(|e| return e.id != session_id);
        let session = Session::new();
        let id = session.id.to_string();
        sessions.insert(0, session);

        return (id, vec![]);
    }

    /// Appends to the named session, bumping its last-activity timestamp. The
    /// first user-authored message on an untitled session derives its display
    /// name. Unknown ids are a no-op.
    pub fn append_message(session_id: &str, message: Message, sessions: &mut [Session]) {
        if let Some(session) = sessions.iter_mut().find(|e| return e.id == session_id) {
            if session.is_new && message.author == Author::User {
                session.name = SessionManager::title_for(std::slice::from_ref(&message));
                session.is_new = false;
            }

            session.timestamp = message.timestamp;
            session.messages.push(message);
        }
    }

    /// Removes the session and reports which id is current afterwards: the
    /// most recently active remaining session, or a synthesized fresh one
    /// when none remain. The caller is responsible for loading the returned
    /// session's messages.
    pub fn delete_session(
        session_id: &str,
        sessions: &mut Vec<Session>,
        current_id: &str,
    ) -> String {
        sessions.retain(|e| return e.id != session_id);

        if session_id != current_id {
            return current_id.to_string();
        }

        if let Some(session) = sessions.iter().max_by_key(|e| return e.timestamp) {
            return session.id.to_string();
        }

        let session = Session::new();
        let id = session.id.to_string();
        sessions.insert(0, session);

        return id;
    }

    pub fn title_for(messages: &[Message]) -> String {
        if let Some(first) = messages.iter().find(|e| return e.author == Author::User) {
            let mut title = first.text.chars().take(TITLE_MAX_CHARS).collect::<String>();
            if first.text.chars().count() > TITLE_MAX_CHARS {
                title.push_str("...");
            }

            return title;
        }

        return DEFAULT_SESSION_NAME.to_string();
    }
}
