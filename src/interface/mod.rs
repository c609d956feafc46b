//! # Interface Layer
//!
//! Command handlers that turn chat commands into calls on the application layer
//! and the results back into replies.

pub mod commands;
