//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, yt-dlp, review webhook
//! - Application: Playback, Reports, Router
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use futures::FutureExt;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::application::dispatcher::ReportDispatcher;
use crate::application::playback::PlaybackController;
use crate::application::reports::ReportStore;
use crate::application::router::CommandRouter;
use crate::domain::config::{AppConfig, Persona};
use crate::domain::traits::{ChatProvider, NotificationChannel};
use crate::infrastructure::matrix::{MatrixReviewChannel, MatrixService};
use crate::infrastructure::media::YtDlpResolver;
use crate::infrastructure::webhook::WebhookChannel;

#[derive(Parser, Debug)]
#[command(name = "slayer", about = "Music queue and abuse report bot for Matrix")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

/// Used when the report persona is disabled and no review target exists.
struct NoReviewChannel;

#[async_trait]
impl NotificationChannel for NoReviewChannel {
    async fn deliver(&self, _summary: &str) -> Result<(), String> {
        Err("no review channel configured".to_string())
    }
}

fn build_review_channel(
    config: &AppConfig,
    client: &Client,
) -> Result<Arc<dyn NotificationChannel>> {
    let review = &config.reports.review;
    if let Some(room) = &review.room {
        tracing::info!("{}", strings::logs::review_channel("room", room));
        return Ok(Arc::new(
            MatrixReviewChannel::new(client.clone(), room)
                .with_context(|| format!("Invalid review room id '{room}'"))?,
        ));
    }
    if let Some(url) = &review.webhook {
        tracing::info!("{}", strings::logs::review_channel("webhook", url));
        return Ok(Arc::new(WebhookChannel::new(url.clone())));
    }
    if config.bot.has(Persona::Report) {
        anyhow::bail!("The report persona needs reports.review.room or reports.review.webhook");
    }
    Ok(Arc::new(NoReviewChannel))
}

fn open_report_store(config: &AppConfig, data_dir: &Path) -> Result<ReportStore> {
    match &config.reports.store_path {
        Some(path) => {
            let path = Path::new(path);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                data_dir.join(path)
            };
            ReportStore::open(path)
        }
        None => Ok(ReportStore::in_memory()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    let data_dir = PathBuf::from(&config.system.data_dir);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
    }

    let file_appender = tracing_appender::rolling::never(&data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(concat!(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,",
            "matrix_sdk_crypto=error,ruma=warn,hyper=warn"
        ))
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("{}", strings::logs::STARTING);
    let personas: Vec<String> = config
        .bot
        .personas
        .iter()
        .map(|p| format!("{p:?}").to_lowercase())
        .collect();
    tracing::info!("{}", strings::logs::personas_enabled(&personas.join(", ")));

    // 3. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("{}", strings::logs::logged_in(&config.services.matrix.username));

    if let Some(name) = &config.services.matrix.display_name {
        tracing::info!("{}", strings::logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", strings::logs::set_display_name_fail(&e.to_string()));
        }
    }

    // 4. Initialize Application Components
    let playback = Arc::new(PlaybackController::new(config.music.queue_capacity));
    let resolver = Arc::new(YtDlpResolver::new(config.music.ytdlp_path.clone()));
    let reports = Arc::new(open_report_store(&config, &data_dir)?);
    let dispatcher = Arc::new(ReportDispatcher::new(
        reports.clone(),
        build_review_channel(&config, &client)?,
        Duration::from_secs(config.reports.delivery_timeout_secs),
    ));
    let router = Arc::new(CommandRouter::new(
        config.clone(),
        playback.clone(),
        resolver,
        reports,
        dispatcher,
    ));

    // Idle Conversation Eviction
    if config.music.idle_eviction_minutes > 0 {
        let max_idle = Duration::from_secs(config.music.idle_eviction_minutes * 60);
        let evict_playback = playback.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                evict_playback.evict_idle(max_idle).await;
            }
        });
    }

    // 5. Event Loop
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }

            let body = text_content.body.clone();
            let sender = original_msg.sender.to_string();
            let chat = MatrixService::new(room);

            let routed = AssertUnwindSafe(router.route(&chat, &body, &sender))
                .catch_unwind()
                .await;

            let room_id = chat.room_id();
            match routed {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("{}", strings::logs::route_failed(&room_id, &e.to_string()));
                }
                Err(_) => {
                    let reason = "handler panicked";
                    tracing::error!("{}", strings::logs::route_failed(&room_id, reason));
                    let _ = chat
                        .send_message(&strings::messages::unexpected_error("internal failure"))
                        .await;
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            let _ = room.join().await;
        }
    });

    // 6. Sync
    tracing::info!("{}", strings::logs::SYNC_LOOP_START);
    if let Err(e) = client.sync(SyncSettings::default()).await {
        tracing::error!("{}", strings::logs::sync_loop_fail(&e.to_string()));
        return Err(e.into());
    }

    Ok(())
}
