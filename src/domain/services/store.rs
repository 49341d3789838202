#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::Session;

/// Durable image of the session list. The whole image is rewritten on save;
/// callers debounce writes so this stays a dumb write-through.
pub struct SessionStore {
    pub data_dir: path::PathBuf,
}

impl Default for SessionStore {
    fn default() -> SessionStore {
        let configured = Config::get(ConfigKey::SessionDir);
        if !configured.is_empty() {
            return SessionStore::new(path::PathBuf::from(configured));
        }

        let data_dir = dirs::data_dir().unwrap().join("parlor/sessions");
        return SessionStore::new(data_dir);
    }
}

impl SessionStore {
    pub fn new(data_dir: path::PathBuf) -> SessionStore {
        return SessionStore { data_dir };
    }

    fn image_path(&self) -> path::PathBuf {
        return self.data_dir.join("sessions.json");
    }

    pub async fn load(&self) -> Result<Vec<Session>> {
        let image_path = self.image_path();
        if !image_path.exists() {
            return Ok(vec![]);
        }

        let payload = fs::read_to_string(image_path).await?;
        let sessions: Vec<Session> = serde_json::from_str(&payload)?;

        return Ok(sessions);
    }

    /// Returns all sessions, but with only the first user message kept per
    /// session to save on memory. Sorted by last activity.
    pub async fn list(&self) -> Result<Vec<Session>> {
        let mut sessions = self.load().await?;

        for session in sessions.iter_mut() {
            let author_messages = session
                .messages
                .iter()
                .filter(|e| return e.author == Author::User)
                .cloned()
                .collect::<Vec<Message>>();
            if author_messages.is_empty() {
                session.messages = vec![];
            } else {
                session.messages = vec![author_messages[0].clone()];
            }
        }

        sessions.sort_by_key(|session| return session.timestamp);

        return Ok(sessions);
    }

    pub async fn save(&self, sessions: &[Session]) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).await?;
        }

        let payload = serde_json::to_string(sessions)?;

        let mut file = fs::File::create(self.image_path()).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.data_dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.data_dir).await?;
        return Ok(());
    }
}
