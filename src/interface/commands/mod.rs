//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., /play, /report, /status).
//! These handlers are invoked by the Router. A handler either sends its reply through the
//! `Responder` and returns `Ok`, or returns a `BotError` that the Router turns into the reply.

pub mod help;
pub mod music;
pub mod report;

use crate::domain::error::BotError;
use crate::domain::traits::ChatProvider;

/// Sends the reply to one command. A placeholder message, once sent, is edited in place
/// by the next `say` instead of posting a second message.
pub struct Responder<'a, C: ChatProvider + ?Sized> {
    chat: &'a C,
    prefix: &'a str,
    placeholder: Option<String>,
}

impl<'a, C: ChatProvider + ?Sized> Responder<'a, C> {
    pub fn new(chat: &'a C, prefix: &'a str) -> Self {
        Self {
            chat,
            prefix,
            placeholder: None,
        }
    }

    pub fn room_id(&self) -> String {
        self.chat.room_id()
    }

    /// Command prefix to quote in replies.
    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    /// Posts a temporary message that the final reply will replace.
    pub async fn placeholder(&mut self, content: &str) {
        match self.chat.send_message(content).await {
            Ok(event_id) => self.placeholder = Some(event_id),
            Err(e) => tracing::warn!("Failed to send placeholder: {}", e),
        }
    }

    pub async fn typing(&self, active: bool) {
        if let Err(e) = self.chat.typing(active).await {
            tracing::debug!("Typing notice failed: {}", e);
        }
    }

    pub async fn say(&mut self, content: &str) -> Result<(), BotError> {
        let sent = match self.placeholder.take() {
            Some(event_id) => self.chat.edit_message(&event_id, content).await,
            None => self.chat.send_message(content).await.map(|_| ()),
        };
        sent.map_err(|e| BotError::external(format!("failed to send reply: {e}")))
    }
}
