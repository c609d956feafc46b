//! # Log Strings
//!
//! Messages written to the tracing log during startup and the sync loop.

pub const STARTING: &str = "Starting Slayer...";
pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn personas_enabled(personas: &str) -> String {
    format!("Enabled personas: {personas}")
}

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub fn route_failed(room: &str, err: &str) -> String {
    format!("Failed to route message in {room}: {err}")
}

pub fn review_channel(kind: &str, target: &str) -> String {
    format!("Reports are delivered to {kind} {target}")
}
