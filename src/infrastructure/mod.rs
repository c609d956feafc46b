//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer
//! (ChatProvider, MediaResolver, NotificationChannel).

pub mod matrix;
pub mod media;
pub mod webhook;
