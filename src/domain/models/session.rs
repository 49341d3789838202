use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::create_id;
use super::Message;

pub const DEFAULT_SESSION_NAME: &str = "New chat";

/// A single conversation thread. Messages are append-only and kept in
/// insertion order; `timestamp` tracks last activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub timestamp: i64,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub is_new: bool,
}

impl Session {
    pub fn new() -> Session {
        return Session {
            id: create_id(),
            name: DEFAULT_SESSION_NAME.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            messages: vec![],
            is_new: true,
        };
    }
}

impl Default for Session {
    fn default() -> Session {
        return Session::new();
    }
}
