//! In-memory fakes of the collaborator traits, shared by the unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::error::BotError;
use crate::domain::traits::{ChatProvider, MediaResolver, NotificationChannel};
use crate::domain::types::MediaInfo;

/// Records everything the bot says in one room.
#[derive(Clone, Default)]
pub struct FakeChat {
    room: String,
    sent: Arc<Mutex<Vec<String>>>,
    edits: Arc<Mutex<Vec<(String, String)>>>,
    timeline: Arc<Mutex<Vec<String>>>,
}

impl FakeChat {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(String, String)> {
        self.edits.lock().unwrap().clone()
    }

    /// The last thing the user saw: the newest message or edit.
    pub fn last_reply(&self) -> String {
        self.timeline.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        self.timeline.lock().unwrap().push(content.to_string());
        Ok(format!("$event{}", sent.len() - 1))
    }

    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String> {
        self.edits
            .lock()
            .unwrap()
            .push((message_id.to_string(), content.to_string()));
        self.timeline.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn typing(&self, _active: bool) -> Result<(), String> {
        Ok(())
    }

    fn room_id(&self) -> String {
        self.room.clone()
    }
}

/// Resolves queries from a fixed catalogue of `query -> title`.
#[derive(Clone, Default)]
pub struct FakeResolver {
    catalogue: HashMap<String, String>,
    broken_audio: bool,
    delay: Option<Duration>,
}

impl FakeResolver {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            catalogue: entries
                .iter()
                .map(|(q, t)| (q.to_string(), t.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn broken_audio(mut self) -> Self {
        self.broken_audio = true;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl MediaResolver for FakeResolver {
    async fn resolve(&self, query: &str) -> Result<Option<MediaInfo>, BotError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.catalogue.get(query).map(|title| MediaInfo {
            id: query.replace(' ', "-"),
            url: None,
            title: title.clone(),
        }))
    }

    async fn extract_audio(&self, id_or_url: &str) -> Result<(String, String), BotError> {
        if self.broken_audio {
            return Err(BotError::external("no audio stream"));
        }
        let title = self
            .catalogue
            .iter()
            .find(|(q, _)| q.replace(' ', "-") == id_or_url)
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| id_or_url.to_string());
        Ok((format!("https://audio.example/{id_or_url}"), title))
    }
}

#[derive(Clone, Copy)]
enum ChannelMode {
    Ok,
    Failing(&'static str),
    Hanging,
}

/// Review channel with a scripted outcome.
#[derive(Clone)]
pub struct FakeChannel {
    mode: ChannelMode,
    delivered: Arc<Mutex<Vec<String>>>,
}

impl FakeChannel {
    pub fn ok() -> Self {
        Self::with_mode(ChannelMode::Ok)
    }

    pub fn failing(error: &'static str) -> Self {
        Self::with_mode(ChannelMode::Failing(error))
    }

    pub fn hanging() -> Self {
        Self::with_mode(ChannelMode::Hanging)
    }

    fn with_mode(mode: ChannelMode) -> Self {
        Self {
            mode,
            delivered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for FakeChannel {
    async fn deliver(&self, summary: &str) -> Result<(), String> {
        match self.mode {
            ChannelMode::Ok => {
                self.delivered.lock().unwrap().push(summary.to_string());
                Ok(())
            }
            ChannelMode::Failing(error) => Err(error.to_string()),
            ChannelMode::Hanging => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}
