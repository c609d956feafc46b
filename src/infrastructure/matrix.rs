//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the generic `ChatProvider` interface used by the
//! bot's core logic and the specific implementation details of the Matrix SDK.
//! It also provides the review-room `NotificationChannel` that moderators read reports from.

use crate::domain::traits::{ChatProvider, NotificationChannel};
use anyhow::Result;
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::relation::Replacement;
use matrix_sdk::ruma::events::room::message::{
    Relation, RoomMessageEventContent, RoomMessageEventContentWithoutRelation,
};
use matrix_sdk::ruma::{EventId, OwnedRoomId, RoomId};
use std::convert::TryFrom;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    /// Helper to send markdown edits
    async fn internal_edit(&self, event_id: &str, new_content: &str) -> Result<()> {
        let event_id = <&EventId>::try_from(event_id)?;
        let mut content = RoomMessageEventContent::text_markdown(new_content);
        let replacement_content = RoomMessageEventContentWithoutRelation::from(content.clone());

        content.relates_to = Some(Relation::Replacement(Replacement::new(
            event_id.to_owned(),
            replacement_content,
        )));

        self.room.send(content).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String> {
        self.internal_edit(message_id, content)
            .await
            .map_err(|e| e.to_string())
    }

    async fn typing(&self, active: bool) -> Result<(), String> {
        self.room
            .typing_notice(active)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Posts report summaries into a moderation room the bot has joined.
/// The room is looked up on every delivery, so joining it after startup is enough.
pub struct MatrixReviewChannel {
    client: Client,
    room_id: OwnedRoomId,
}

impl MatrixReviewChannel {
    pub fn new(client: Client, room_id: &str) -> Result<Self> {
        let room_id = <&RoomId>::try_from(room_id)?.to_owned();
        Ok(Self { client, room_id })
    }
}

#[async_trait]
impl NotificationChannel for MatrixReviewChannel {
    async fn deliver(&self, summary: &str) -> Result<(), String> {
        let room = self
            .client
            .get_room(&self.room_id)
            .ok_or_else(|| format!("review room {} is not joined", self.room_id))?;
        MatrixService::new(room).send_message(summary).await.map(|_| ())
    }
}
