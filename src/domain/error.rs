//! # Domain Errors
//!
//! The error taxonomy shared by the queue, playback and report components.
//! Every variant is rendered into exactly one user-facing reply by the command layer.

use thiserror::Error;

use crate::domain::types::ReportStatus;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BotError {
    /// Malformed command arguments.
    #[error("{0}")]
    Input(String),

    #[error("queue is full ({capacity} tracks)")]
    QueueFull { capacity: usize },

    #[error("something is already playing")]
    AlreadyPlaying,

    #[error("nothing is currently playing")]
    NothingPlaying,

    #[error("report #{0} not found")]
    ReportNotFound(u64),

    /// Status query for a report the requester does not own (or that does not exist).
    #[error("not authorized to view report #{0}")]
    Unauthorized(u64),

    #[error("report #{id} is already {status}")]
    InvalidTransition { id: u64, status: ReportStatus },

    /// Media resolution, audio extraction, or report delivery failed.
    #[error("{0}")]
    External(String),
}

impl BotError {
    pub fn input(message: impl Into<String>) -> Self {
        BotError::Input(message.into())
    }

    pub fn external(message: impl Into<String>) -> Self {
        BotError::External(message.into())
    }
}
