//! # Domain Traits
//!
//! Abstract interfaces for the collaborators of the bot core (Chat, Media, Review channel).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::error::BotError;
use crate::domain::types::MediaInfo;

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Edit a message in the room
    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Looks up media and extracts a streamable audio URL.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve a URL or a free-text search query. `Ok(None)` means nothing matched.
    async fn resolve(&self, query: &str) -> Result<Option<MediaInfo>, BotError>;

    /// Extract `(audio_url, title)` for a video id or page URL.
    async fn extract_audio(&self, id_or_url: &str) -> Result<(String, String), BotError>;
}

/// Review channel that receives submitted reports.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, summary: &str) -> Result<(), String>;
}
