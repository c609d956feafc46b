//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix login, the enabled personas, the music queue
//! and the report pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub music: MusicConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    /// Reads and parses the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        if config.music.queue_capacity == 0 {
            anyhow::bail!("music.queue_capacity must be at least 1");
        }
        Ok(config)
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Which bot personalities answer commands.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Music,
    Report,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_personas")]
    pub personas: Vec<Persona>,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Local part of the bot's user id, accepted as `/cmd@name`.
    #[serde(default)]
    pub username: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            personas: default_personas(),
            command_prefix: default_command_prefix(),
            username: None,
        }
    }
}

impl BotConfig {
    pub fn has(&self, persona: Persona) -> bool {
        self.personas.contains(&persona)
    }
}

fn default_personas() -> Vec<Persona> {
    vec![Persona::Music, Persona::Report]
}

fn default_command_prefix() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MusicConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: u64,
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: String,
    /// Idle conversations with nothing queued are dropped after this many minutes.
    /// `0` disables eviction.
    #[serde(default = "default_idle_eviction")]
    pub idle_eviction_minutes: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            resolve_timeout_secs: default_resolve_timeout(),
            ytdlp_path: default_ytdlp_path(),
            idle_eviction_minutes: default_idle_eviction(),
        }
    }
}

fn default_queue_capacity() -> usize {
    50
}
fn default_resolve_timeout() -> u64 {
    30
}
fn default_ytdlp_path() -> String {
    "yt-dlp".to_string()
}
fn default_idle_eviction() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// JSON file holding the report table. Relative paths are resolved against `system.data_dir`.
    #[serde(default = "default_store_path")]
    pub store_path: Option<String>,
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
    #[serde(default)]
    pub review: ReviewConfig,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            delivery_timeout_secs: default_delivery_timeout(),
            review: ReviewConfig::default(),
        }
    }
}

fn default_store_path() -> Option<String> {
    Some("reports.json".to_string())
}
fn default_delivery_timeout() -> u64 {
    15
}

/// Where submitted reports are delivered for moderation.
/// A Matrix room takes precedence over a webhook when both are set.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ReviewConfig {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub webhook: Option<String>,
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}
