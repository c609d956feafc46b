//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the music queue and playback state, the report lifecycle, and command routing.

pub mod dispatcher;
pub mod parsing;
pub mod playback;
pub mod queue;
pub mod reports;
pub mod router;
