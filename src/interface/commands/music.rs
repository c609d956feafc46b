//! # Music Commands
//!
//! Handles `/play`, `/pause`, `/resume`, `/skip`, `/stop`, `/queue` and `/now_playing`.
//! Media lookups run without holding any queue lock and are bounded by the configured timeout.

use std::time::Duration;

use crate::application::playback::{Enqueued, PlaybackController};
use crate::domain::error::BotError;
use crate::domain::traits::{ChatProvider, MediaResolver};
use crate::domain::types::Track;
use crate::interface::commands::Responder;
use crate::strings::messages;

/// Resolves `query` into a playable track.
async fn resolve_track(resolver: &dyn MediaResolver, query: &str) -> Result<Track, BotError> {
    let info = resolver
        .resolve(query)
        .await?
        .ok_or_else(|| BotError::external(messages::NO_RESULTS))?;

    let source = info.url.as_deref().unwrap_or(&info.id);
    let (audio_url, title) = resolver.extract_audio(source).await.map_err(|e| {
        tracing::warn!("Audio extraction failed for {}: {}", source, e);
        BotError::external(messages::NO_AUDIO)
    })?;
    if audio_url.is_empty() || title.is_empty() {
        return Err(BotError::external(messages::NO_AUDIO));
    }
    Ok(Track::new(audio_url, title))
}

pub async fn handle_play<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    resolver: &dyn MediaResolver,
    timeout: Duration,
    responder: &mut Responder<'_, C>,
    query: &str,
) -> Result<(), BotError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(BotError::input(messages::play_usage(responder.prefix())));
    }

    responder.placeholder(messages::SEARCHING).await;
    responder.typing(true).await;
    let resolved = tokio::time::timeout(timeout, resolve_track(resolver, query)).await;
    responder.typing(false).await;

    let track = match resolved {
        Ok(track) => track?,
        Err(_) => {
            tracing::warn!("Media lookup for '{}' timed out after {:?}", query, timeout);
            return Err(BotError::external(messages::SEARCH_TIMED_OUT));
        }
    };

    let title = track.title.clone();
    let reply = match playback.enqueue_or_promote(&responder.room_id(), track).await? {
        Enqueued::NowPlaying => messages::now_playing_added(&title),
        Enqueued::Queued { position } => messages::queued_at(position, &title),
    };
    responder.say(&reply).await
}

pub async fn handle_pause<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let changed = playback.pause(&responder.room_id()).await?;
    responder.say(&messages::paused(changed)).await
}

pub async fn handle_resume<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let changed = playback.resume(&responder.room_id()).await?;
    responder.say(&messages::resumed(changed)).await
}

pub async fn handle_skip<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let skipped = playback
        .skip(&responder.room_id())
        .await
        .ok_or(BotError::NothingPlaying)?;
    responder.say(&messages::skipped(&skipped.title)).await
}

pub async fn handle_stop<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    if !playback.leave(&responder.room_id()).await {
        return Err(BotError::NothingPlaying);
    }
    responder.say(messages::QUEUE_CLEARED).await
}

pub async fn handle_queue<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let snapshot = playback.snapshot(&responder.room_id()).await;
    responder.say(&messages::queue_listing(&snapshot)).await
}

pub async fn handle_now_playing<C: ChatProvider + ?Sized>(
    playback: &PlaybackController,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let snapshot = playback.snapshot(&responder.room_id()).await;
    let current = snapshot.current.ok_or(BotError::NothingPlaying)?;
    responder
        .say(&messages::current_song(&current.title, snapshot.state))
        .await
}
