//! # Queue Manager
//!
//! Bounded FIFO of pending tracks plus the single "now playing" slot of one conversation.
//! Tracks move from the pending list into the current slot and are never duplicated.

use std::collections::VecDeque;

use crate::domain::error::BotError;
use crate::domain::types::Track;

#[derive(Debug, Clone)]
pub struct QueueManager {
    current: Option<Track>,
    pending: VecDeque<Track>,
    capacity: usize,
}

impl QueueManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: None,
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a track to the pending list and returns its 1-based position.
    /// A full queue is left untouched.
    pub fn add(&mut self, track: Track) -> Result<usize, BotError> {
        if self.pending.len() >= self.capacity {
            return Err(BotError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.pending.push_back(track);
        Ok(self.pending.len())
    }

    /// Removes and returns the head of the pending list.
    pub fn pop_next(&mut self) -> Option<Track> {
        self.pending.pop_front()
    }

    /// Snapshot of the pending list in insertion order.
    pub fn get_queue(&self) -> Vec<Track> {
        self.pending.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.pending.clear();
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Fills an empty current slot. Returns the track back if the slot is taken.
    pub(crate) fn set_current(&mut self, track: Track) -> Result<(), Track> {
        if self.current.is_some() {
            return Err(track);
        }
        self.current = Some(track);
        Ok(())
    }

    /// Replaces the current track with the head of the pending list.
    /// Returns the track that was playing before.
    pub(crate) fn advance(&mut self) -> Option<Track> {
        let previous = self.current.take();
        self.current = self.pop_next();
        previous
    }
}

#[cfg(test)]
impl QueueManager {
    fn len(&self) -> usize {
        self.pending.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        Track::new(format!("https://media.example/{name}"), name)
    }

    #[test]
    fn test_full_queue_rejects_without_mutation() {
        let mut queue = QueueManager::new(1);
        assert_eq!(queue.add(track("A")).unwrap(), 1);
        assert_eq!(
            queue.add(track("B")),
            Err(BotError::QueueFull { capacity: 1 })
        );
        assert_eq!(queue.get_queue(), vec![track("A")]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut queue = QueueManager::new(3);
        for i in 0..10 {
            let _ = queue.add(track(&format!("t{i}")));
            assert!(queue.len() <= queue.capacity());
        }
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = QueueManager::new(5);
        let names = ["one", "two", "three", "four"];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(queue.add(track(name)).unwrap(), i + 1);
        }
        for name in names {
            assert_eq!(queue.pop_next(), Some(track(name)));
        }
        assert_eq!(queue.pop_next(), None);
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn test_is_empty_tracks_both_slots() {
        let mut queue = QueueManager::new(2);
        assert!(queue.is_empty());

        queue.set_current(track("A")).unwrap();
        assert!(!queue.is_empty());

        queue.add(track("B")).unwrap();
        assert_eq!(queue.advance(), Some(track("A")));
        assert_eq!(queue.current(), Some(&track("B")));
        assert!(!queue.is_empty());

        assert_eq!(queue.advance(), Some(track("B")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_set_current_refuses_occupied_slot() {
        let mut queue = QueueManager::new(2);
        queue.set_current(track("A")).unwrap();
        assert_eq!(queue.set_current(track("B")), Err(track("B")));
        assert_eq!(queue.current(), Some(&track("A")));
    }

    #[test]
    fn test_clear() {
        let mut queue = QueueManager::new(2);
        queue.set_current(track("A")).unwrap();
        queue.add(track("B")).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.get_queue().is_empty());
    }
}
