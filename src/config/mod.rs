// Configuration management for spo
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

// Spotify caps search results per page at 50
pub const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub player: PlayerConfig,
    pub volume: VolumeConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub market: Option<String>,
    pub api_base: String,
    pub accounts_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub bus_name: String,
    pub launch_command: Vec<String>,
    /// Wait before reading metadata, the client needs a moment after a skip
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub up_command: Vec<String>,
    pub down_command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub max_visible_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify: SpotifyConfig::default(),
            player: PlayerConfig::default(),
            volume: VolumeConfig::default(),
            search: SearchConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            market: None,
            api_base: "https://api.spotify.com/v1".to_string(),
            accounts_base: "https://accounts.spotify.com".to_string(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            bus_name: "org.mpris.MediaPlayer2.spotify".to_string(),
            launch_command: vec!["spotify".to_string(), "--minimized".to_string()],
            settle_delay_ms: 500,
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        let amixer = |step: &str| {
            ["amixer", "-q", "-D", "pulse", "sset", "Master", step]
                .iter()
                .map(|s| s.to_string())
                .collect()
        };

        Self {
            up_command: amixer("5%+"),
            down_command: amixer("5%-"),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { max_visible_rows: 10 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path, writing defaults there if nothing exists yet
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("spo");

        Ok(config_dir.join("config.toml"))
    }
}

impl SpotifyConfig {
    /// Environment wins over the file so secrets can stay out of it
    pub fn credentials(&self) -> Option<(String, String)> {
        let id = std::env::var(CLIENT_ID_ENV).ok().or_else(|| self.client_id.clone())?;
        let secret = std::env::var(CLIENT_SECRET_ENV)
            .ok()
            .or_else(|| self.client_secret.clone())?;

        if id.is_empty() || secret.is_empty() {
            return None;
        }
        Some((id, secret))
    }
}

impl SearchConfig {
    pub fn clamp_limit(limit: u32) -> u32 {
        limit.clamp(1, MAX_SEARCH_LIMIT)
    }
}
