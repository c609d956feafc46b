//! # Playback Controller
//!
//! Keeps one `QueueManager` per conversation in an explicit registry and simulates the
//! playback head on top of it. Audio output is disabled: the controller only tracks which
//! track is current and whether it is paused, so callers must tell users nothing is audible.
//!
//! Each conversation sits behind its own `tokio::sync::Mutex`. The lock is fair, so queue
//! mutations are applied in the order their commands acquired it, and it is never held
//! across an `.await` on an external collaborator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::queue::QueueManager;
use crate::domain::error::BotError;
use crate::domain::types::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Empty,
    Playing,
    Paused,
}

/// Outcome of routing a track through `enqueue_or_promote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Nothing was playing; the track became current.
    NowPlaying,
    /// The track waits at this 1-based position.
    Queued { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    pub current: Option<Track>,
    pub pending: Vec<Track>,
    pub state: PlaybackState,
}

#[derive(Debug)]
struct Conversation {
    queue: QueueManager,
    paused: bool,
    last_activity: Instant,
}

impl Conversation {
    fn new(capacity: usize) -> Self {
        Self {
            queue: QueueManager::new(capacity),
            paused: false,
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn state(&self) -> PlaybackState {
        match (self.queue.current(), self.paused) {
            (None, _) => PlaybackState::Empty,
            (Some(_), true) => PlaybackState::Paused,
            (Some(_), false) => PlaybackState::Playing,
        }
    }

    /// Moves the head of the pending list into the current slot.
    fn advance(&mut self) -> Option<Track> {
        self.paused = false;
        self.touch();
        self.queue.advance()
    }
}

type SharedConversation = Arc<Mutex<Conversation>>;

pub struct PlaybackController {
    capacity: usize,
    conversations: Mutex<HashMap<String, SharedConversation>>,
}

impl PlaybackController {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Gets or creates the state for a conversation.
    async fn conversation(&self, conversation_id: &str) -> SharedConversation {
        let mut guard = self.conversations.lock().await;
        guard
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new(self.capacity))))
            .clone()
    }

    async fn existing(&self, conversation_id: &str) -> Option<SharedConversation> {
        self.conversations.lock().await.get(conversation_id).cloned()
    }

    /// Makes `track` current. Only valid while nothing is current.
    #[allow(dead_code)]
    pub async fn play_song(&self, conversation_id: &str, track: Track) -> Result<(), BotError> {
        let conversation = self.conversation(conversation_id).await;
        let mut conv = conversation.lock().await;
        conv.queue
            .set_current(track)
            .map_err(|_| BotError::AlreadyPlaying)?;
        conv.paused = false;
        conv.touch();
        tracing::info!("Now playing in {}", conversation_id);
        Ok(())
    }

    /// Plays `track` right away when the conversation is idle, otherwise appends it.
    pub async fn enqueue_or_promote(
        &self,
        conversation_id: &str,
        track: Track,
    ) -> Result<Enqueued, BotError> {
        let conversation = self.conversation(conversation_id).await;
        let mut conv = conversation.lock().await;
        let outcome = match conv.queue.set_current(track) {
            Ok(()) => {
                conv.paused = false;
                Enqueued::NowPlaying
            }
            Err(track) => Enqueued::Queued {
                position: conv.queue.add(track)?,
            },
        };
        conv.touch();
        tracing::debug!("Enqueued in {}: {:?}", conversation_id, outcome);
        Ok(outcome)
    }

    #[allow(dead_code)]
    pub async fn get_now_playing(&self, conversation_id: &str) -> Option<Track> {
        let conversation = self.existing(conversation_id).await?;
        let conv = conversation.lock().await;
        conv.queue.current().cloned()
    }

    #[allow(dead_code)]
    pub async fn state(&self, conversation_id: &str) -> PlaybackState {
        match self.existing(conversation_id).await {
            Some(conversation) => conversation.lock().await.state(),
            None => PlaybackState::Empty,
        }
    }

    pub async fn snapshot(&self, conversation_id: &str) -> QueueSnapshot {
        match self.existing(conversation_id).await {
            Some(conversation) => {
                let conv = conversation.lock().await;
                QueueSnapshot {
                    current: conv.queue.current().cloned(),
                    pending: conv.queue.get_queue(),
                    state: conv.state(),
                }
            }
            None => QueueSnapshot {
                current: None,
                pending: Vec::new(),
                state: PlaybackState::Empty,
            },
        }
    }

    /// Replaces the current track with the next pending one.
    /// Returns the skipped track, or `None` if nothing was playing.
    pub async fn skip(&self, conversation_id: &str) -> Option<Track> {
        let conversation = self.existing(conversation_id).await?;
        let mut conv = conversation.lock().await;
        conv.queue.current()?;
        let skipped = conv.advance();
        tracing::info!(
            "Skipped in {}, next: {:?}",
            conversation_id,
            conv.queue.current().map(|t| t.title.as_str())
        );
        skipped
    }

    /// Called by the playback head when the current track ends.
    /// Returns the new current track, if any.
    #[allow(dead_code)]
    pub async fn track_finished(&self, conversation_id: &str) -> Option<Track> {
        let conversation = self.existing(conversation_id).await?;
        let mut conv = conversation.lock().await;
        conv.queue.current()?;
        conv.advance();
        conv.queue.current().cloned()
    }

    /// Returns `Ok(true)` when the state changed and `Ok(false)` when already paused.
    pub async fn pause(&self, conversation_id: &str) -> Result<bool, BotError> {
        self.set_paused(conversation_id, true).await
    }

    /// Returns `Ok(true)` when the state changed and `Ok(false)` when already playing.
    pub async fn resume(&self, conversation_id: &str) -> Result<bool, BotError> {
        self.set_paused(conversation_id, false).await
    }

    async fn set_paused(&self, conversation_id: &str, paused: bool) -> Result<bool, BotError> {
        let conversation = self
            .existing(conversation_id)
            .await
            .ok_or(BotError::NothingPlaying)?;
        let mut conv = conversation.lock().await;
        if conv.queue.current().is_none() {
            return Err(BotError::NothingPlaying);
        }
        if conv.paused == paused {
            return Ok(false);
        }
        conv.paused = paused;
        conv.touch();
        Ok(true)
    }

    /// Clears the current track and the pending list.
    /// Returns whether there was anything to clear.
    pub async fn leave(&self, conversation_id: &str) -> bool {
        let Some(conversation) = self.existing(conversation_id).await else {
            return false;
        };
        let mut conv = conversation.lock().await;
        let had_anything = !conv.queue.is_empty();
        conv.queue.clear();
        conv.paused = false;
        conv.touch();
        had_anything
    }

    /// Drops idle conversations that hold no tracks. Busy conversations are kept.
    ///
    /// A conversation some caller has fetched but not locked yet counts as busy:
    /// its `Arc` is shared beyond the registry.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut guard = self.conversations.lock().await;
        let before = guard.len();
        guard.retain(|_, conversation| {
            if Arc::strong_count(conversation) > 1 {
                return true;
            }
            match conversation.try_lock() {
                Ok(conv) => !(conv.queue.is_empty() && conv.last_activity.elapsed() >= max_idle),
                Err(_) => true,
            }
        });
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle conversations", evicted);
        }
        evicted
    }

}

#[cfg(test)]
impl PlaybackController {
    async fn conversation_count(&self) -> usize {
        self.conversations.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "!room:example.org";

    fn track(name: &str) -> Track {
        Track::new(format!("https://media.example/{name}"), name)
    }

    #[tokio::test]
    async fn test_play_song_only_when_empty() {
        let controller = PlaybackController::new(5);
        controller.play_song(ROOM, track("T1")).await.unwrap();
        assert_eq!(controller.get_now_playing(ROOM).await, Some(track("T1")));

        let err = controller.play_song(ROOM, track("T2")).await.unwrap_err();
        assert_eq!(err, BotError::AlreadyPlaying);
        assert_eq!(controller.get_now_playing(ROOM).await, Some(track("T1")));

        // The caller routes the second track through the queue instead.
        let outcome = controller.enqueue_or_promote(ROOM, track("T2")).await.unwrap();
        assert_eq!(outcome, Enqueued::Queued { position: 1 });
    }

    #[tokio::test]
    async fn test_enqueue_or_promote() {
        let controller = PlaybackController::new(1);
        assert_eq!(
            controller.enqueue_or_promote(ROOM, track("A")).await.unwrap(),
            Enqueued::NowPlaying
        );
        assert_eq!(
            controller.enqueue_or_promote(ROOM, track("B")).await.unwrap(),
            Enqueued::Queued { position: 1 }
        );
        assert_eq!(
            controller.enqueue_or_promote(ROOM, track("C")).await,
            Err(BotError::QueueFull { capacity: 1 })
        );
        let snapshot = controller.snapshot(ROOM).await;
        assert_eq!(snapshot.current, Some(track("A")));
        assert_eq!(snapshot.pending, vec![track("B")]);
    }

    #[tokio::test]
    async fn test_skip_advances_then_empties() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote(ROOM, track("T1")).await.unwrap();
        controller.enqueue_or_promote(ROOM, track("T2")).await.unwrap();

        assert_eq!(controller.skip(ROOM).await, Some(track("T1")));
        let snapshot = controller.snapshot(ROOM).await;
        assert_eq!(snapshot.current, Some(track("T2")));
        assert!(snapshot.pending.is_empty());

        assert_eq!(controller.skip(ROOM).await, Some(track("T2")));
        assert_eq!(controller.get_now_playing(ROOM).await, None);
        assert_eq!(controller.skip(ROOM).await, None);
        assert_eq!(controller.state(ROOM).await, PlaybackState::Empty);
    }

    #[tokio::test]
    async fn test_pause_resume_idempotent() {
        let controller = PlaybackController::new(5);
        assert_eq!(controller.pause(ROOM).await, Err(BotError::NothingPlaying));

        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        assert_eq!(controller.state(ROOM).await, PlaybackState::Playing);

        assert_eq!(controller.pause(ROOM).await, Ok(true));
        assert_eq!(controller.pause(ROOM).await, Ok(false));
        assert_eq!(controller.state(ROOM).await, PlaybackState::Paused);

        assert_eq!(controller.resume(ROOM).await, Ok(true));
        assert_eq!(controller.resume(ROOM).await, Ok(false));
        assert_eq!(controller.state(ROOM).await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_skip_while_paused_resumes_next() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        controller.enqueue_or_promote(ROOM, track("B")).await.unwrap();
        controller.pause(ROOM).await.unwrap();
        controller.skip(ROOM).await;
        assert_eq!(controller.state(ROOM).await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_track_finished_auto_advances() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        controller.enqueue_or_promote(ROOM, track("B")).await.unwrap();
        assert_eq!(controller.track_finished(ROOM).await, Some(track("B")));
        assert_eq!(controller.track_finished(ROOM).await, None);
        assert_eq!(controller.state(ROOM).await, PlaybackState::Empty);
    }

    #[tokio::test]
    async fn test_leave_clears_everything() {
        let controller = PlaybackController::new(5);
        assert!(!controller.leave(ROOM).await);

        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        controller.enqueue_or_promote(ROOM, track("B")).await.unwrap();
        controller.pause(ROOM).await.unwrap();
        assert!(controller.leave(ROOM).await);

        let snapshot = controller.snapshot(ROOM).await;
        assert_eq!(snapshot.state, PlaybackState::Empty);
        assert!(snapshot.current.is_none() && snapshot.pending.is_empty());
        assert!(!controller.leave(ROOM).await);

        // Restarts from EMPTY on the next play.
        assert_eq!(
            controller.enqueue_or_promote(ROOM, track("C")).await.unwrap(),
            Enqueued::NowPlaying
        );
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote("!a:x", track("A")).await.unwrap();
        assert_eq!(
            controller.enqueue_or_promote("!b:x", track("B")).await.unwrap(),
            Enqueued::NowPlaying
        );
        assert_eq!(controller.get_now_playing("!a:x").await, Some(track("A")));
    }

    #[tokio::test]
    async fn test_concurrent_enqueue_keeps_positions_unique() {
        let controller = Arc::new(PlaybackController::new(100));
        controller.enqueue_or_promote(ROOM, track("head")).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller
                        .enqueue_or_promote(ROOM, track(&format!("t{i}")))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut positions = Vec::new();
        for outcome in futures::future::join_all(handles).await {
            match outcome.unwrap() {
                Enqueued::Queued { position } => positions.push(position),
                Enqueued::NowPlaying => panic!("head track was already playing"),
            }
        }
        positions.sort();
        assert_eq!(positions, (1..=20).collect::<Vec<_>>());
        assert_eq!(controller.snapshot(ROOM).await.pending.len(), 20);
    }

    #[tokio::test]
    async fn test_evict_idle_only_drops_empty() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote("!busy:x", track("A")).await.unwrap();
        controller.enqueue_or_promote("!idle:x", track("B")).await.unwrap();
        controller.leave("!idle:x").await;
        assert_eq!(controller.conversation_count().await, 2);

        assert_eq!(controller.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(controller.conversation_count().await, 1);
        assert_eq!(controller.get_now_playing("!busy:x").await, Some(track("A")));
    }

    #[tokio::test]
    async fn test_evict_idle_respects_age() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        controller.leave(ROOM).await;
        assert_eq!(controller.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(controller.conversation_count().await, 1);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_fetched_conversation() {
        let controller = PlaybackController::new(5);
        controller.enqueue_or_promote(ROOM, track("A")).await.unwrap();
        controller.leave(ROOM).await;

        // A command has fetched the entry but not locked it yet.
        let fetched = controller.conversation(ROOM).await;
        assert_eq!(controller.evict_idle(Duration::ZERO).await, 0);

        fetched.lock().await.queue.set_current(track("B")).unwrap();
        drop(fetched);
        assert_eq!(controller.get_now_playing(ROOM).await, Some(track("B")));

        controller.leave(ROOM).await;
        assert_eq!(controller.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(controller.conversation_count().await, 0);
    }
}
