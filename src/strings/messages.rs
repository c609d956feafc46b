//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, queue listings, and report summaries.

use crate::application::playback::{PlaybackState, QueueSnapshot};
use crate::domain::error::BotError;
use crate::domain::types::{Report, ReportStatus};

pub fn unknown_command(prefix: &str) -> String {
    format!("❓ Unknown command. Use {prefix}help to see what I can do.")
}

pub const PLAYBACK_DISABLED_NOTE: &str =
    "⚠️ Note: Actual audio playback is disabled in this version.";

// Music
pub fn play_usage(prefix: &str) -> String {
    format!(
        "Please provide a YouTube URL or search term!\n\
         Usage: {prefix}play [url or search term]"
    )
}

pub const SEARCHING: &str = "🔍 Searching for your song...";
pub const NO_RESULTS: &str =
    "No songs found for your query. Please try again with a different search term.";
pub const NO_AUDIO: &str = "Couldn't extract audio from this video. Please try another one.";
pub const SEARCH_TIMED_OUT: &str = "The search took too long. Please try again later.";
pub const NOTHING_QUEUED: &str = "❌ Nothing is currently in the queue.";
pub const QUEUE_CLEARED: &str = "⏹️ Queue cleared.";

pub fn now_playing_added(title: &str) -> String {
    format!("🎵 Added to queue: **{title}**\n\n{PLAYBACK_DISABLED_NOTE}")
}

pub fn queued_at(position: usize, title: &str) -> String {
    format!("✅ Added to queue at position #{position}: **{title}**\n\n{PLAYBACK_DISABLED_NOTE}")
}

pub fn skipped(title: &str) -> String {
    format!("⏭️ Skipped: **{title}**")
}

pub fn paused(changed: bool) -> String {
    if changed {
        format!("⏸️ Paused.\n\n{PLAYBACK_DISABLED_NOTE}")
    } else {
        "⏸️ Already paused.".to_string()
    }
}

pub fn resumed(changed: bool) -> String {
    if changed {
        format!("▶️ Resumed.\n\n{PLAYBACK_DISABLED_NOTE}")
    } else {
        "▶️ Already playing.".to_string()
    }
}

pub fn current_song(title: &str, state: PlaybackState) -> String {
    let paused = if state == PlaybackState::Paused { " (paused)" } else { "" };
    format!("🎵 **Current song:** {title}{paused}\n\n{PLAYBACK_DISABLED_NOTE}")
}

pub fn queue_listing(snapshot: &QueueSnapshot) -> String {
    let Some(current) = &snapshot.current else {
        return "📭 The queue is empty.".to_string();
    };

    let mut msg = format!("🎵 **Now playing:** {}", current.title);
    if snapshot.state == PlaybackState::Paused {
        msg.push_str(" (paused)");
    }
    msg.push('\n');

    if snapshot.pending.is_empty() {
        msg.push_str("\nNo more songs in the queue.");
    } else {
        msg.push_str("\n📋 **Up next:**\n");
        for (i, track) in snapshot.pending.iter().enumerate() {
            msg.push_str(&format!("{}. {}\n", i + 1, track.title));
        }
    }
    msg.push_str(&format!("\n\n{PLAYBACK_DISABLED_NOTE}"));
    msg
}

// Reports
pub const REPORT_ID_NOT_NUMBER: &str = "Report ID must be a number.";
pub const INVALID_TARGET_TYPE: &str = "Invalid target type. Use 'user', 'message', or 'channel'.";
pub const INVALID_USER_TARGET: &str =
    "User ID must be a number or a Matrix user id (@user:server).";
pub const INVALID_MESSAGE_TARGET: &str = "Message target must look like <chat_id>:<message_id>.";
pub const CHAT_ID_OUT_OF_RANGE: &str = "Chat ID is out of range.";
pub const MESSAGE_ID_OUT_OF_RANGE: &str = "Message ID is out of range.";
pub const MISSING_CHANNEL_ID: &str = "Please provide a channel ID.";
pub const MISSING_REPORT_TARGET: &str = "Please provide a target for the report.";
pub const MISSING_REPORT_REASON: &str = "Please provide a reason for the report.";
pub const REPORT_NOT_SAVED: &str = "Your report could not be saved. Please try again later.";

pub fn report_usage(prefix: &str) -> String {
    format!(
        "Incorrect format. Use:\n\
         {prefix}report user <user_id> <reason>\n\
         {prefix}report message <chat_id>:<message_id> <reason>\n\
         {prefix}report channel <channel_id> <reason>"
    )
}

pub fn status_usage(prefix: &str) -> String {
    format!("Please provide a report ID. Usage: {prefix}status <report_id>")
}

pub fn report_created(report: &Report, prefix: &str) -> String {
    format!(
        "✅ Report #{id} created successfully!\n\
         Type: {kind}\nTarget: {target}\nReason: {reason}\n\n\
         Use {prefix}status {id} to check the status of your report.",
        id = report.id,
        kind = report.target_type,
        target = report.target_id,
        reason = report.reason,
    )
}

fn status_emoji(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "⏳",
        ReportStatus::Completed => "✅",
        ReportStatus::Failed => "❌",
    }
}

pub fn report_status(report: &Report) -> String {
    let mut msg = format!(
        "{} **Report #{}**\n\nType: {}\nTarget: {}\nReason: {}\nStatus: {}\n",
        status_emoji(report.status),
        report.id,
        report.target_type,
        report.target_id,
        report.reason,
        report.status.as_str().to_uppercase(),
    );
    if report.status == ReportStatus::Failed {
        if let Some(error) = &report.error {
            msg.push_str(&format!("Error: {error}\n"));
        }
    }
    msg
}

/// Text delivered to the review channel.
pub fn report_summary(report: &Report) -> String {
    format!(
        "🚨 **New report #{}**\nFrom: {}\nType: {}\nTarget: {}\nReason: {}\nSubmitted: {}",
        report.id,
        report.requester_id,
        report.target_type,
        report.target_id,
        report.reason,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// The single reply sent for a failed command.
pub fn error_reply(error: &BotError) -> String {
    match error {
        BotError::Input(msg) => format!("⚠️ {msg}"),
        BotError::QueueFull { .. } => "❌ Queue is full! Please try again later.".to_string(),
        BotError::AlreadyPlaying => "❌ Something is already playing.".to_string(),
        BotError::NothingPlaying => NOTHING_QUEUED.to_string(),
        BotError::ReportNotFound(id) => format!("⚠️ Report #{id} not found."),
        BotError::Unauthorized(_) => {
            "⚠️ You can only check the status of your own reports.".to_string()
        }
        BotError::InvalidTransition { id, status } => {
            format!("⚠️ Report #{id} is already {status}.")
        }
        BotError::External(msg) => format!("❌ {msg}"),
    }
}

pub fn unexpected_error(err: &str) -> String {
    format!("❌ An error occurred: {err}")
}
