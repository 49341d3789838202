#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    AvatarUrl,
    ConfigFile,
    InferenceTimeout,
    InferenceUrl,
    LogGroup,
    SessionDir,
    TelemetryUrl,
    UserId,
    Username,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        let config_path = dirs::config_dir().unwrap().join("parlor/config.toml");

        let res = match key {
            ConfigKey::AvatarUrl => "",
            ConfigKey::InferenceTimeout => "30000",
            ConfigKey::InferenceUrl => "",
            ConfigKey::LogGroup => "/aws/lambda/inference",
            ConfigKey::SessionDir => "",
            ConfigKey::TelemetryUrl => "",
            ConfigKey::UserId => "",

            // Special
            ConfigKey::ConfigFile => config_path.to_str().unwrap(),
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    /// Resets every key to its default, then overlays values from the config
    /// file when one exists. A missing user id is a hard failure as there is
    /// no signed-in identity to run under.
    pub async fn load(config_file: Option<&str>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let file = config_file
            .map(|e| return e.to_string())
            .unwrap_or_else(|| return Config::default(ConfigKey::ConfigFile));
        Config::set(ConfigKey::ConfigFile, &file);

        let config_path = path::PathBuf::from(&file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        if Config::get(ConfigKey::UserId).is_empty() {
            bail!("config is missing required key 'user-id'");
        }

        tracing::debug!(
            username = Config::get(ConfigKey::Username),
            user_id = Config::get(ConfigKey::UserId),
            inference_url = Config::get(ConfigKey::InferenceUrl),
            telemetry_url = Config::get(ConfigKey::TelemetryUrl),
            log_group = Config::get(ConfigKey::LogGroup),
            "config"
        );

        return Ok(());
    }
}
