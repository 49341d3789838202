use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// The signed-in user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn from_config() -> Result<Identity> {
        let id = Config::get(ConfigKey::UserId);
        if id.is_empty() {
            bail!("no signed-in user id configured");
        }

        let mut display_name = Config::get(ConfigKey::Username);
        if display_name.is_empty() {
            display_name = "User".to_string();
        }

        let avatar = Config::get(ConfigKey::AvatarUrl);
        let avatar_url = if avatar.is_empty() { None } else { Some(avatar) };

        return Ok(Identity {
            id,
            display_name,
            avatar_url,
        });
    }
}
