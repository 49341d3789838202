#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Author;

pub fn create_id() -> String {
    return Uuid::new_v4()
        .to_string()
        .split('-')
        .enumerate()
        .filter_map(|(idx, str)| {
            if idx > 1 {
                return None;
            }
            return Some(str);
        })
        .collect::<Vec<&str>>()
        .join("-");
}

/// A single chat entry. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub markdown: bool,
    pub timestamp: i64,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message::new_with_markdown(author, text, false);
    }

    pub fn new_with_markdown(author: Author, text: &str, markdown: bool) -> Message {
        return Message {
            id: create_id(),
            author,
            text: text.to_string(),
            markdown,
            timestamp: Utc::now().timestamp_millis(),
        };
    }
}
