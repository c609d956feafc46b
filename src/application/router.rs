//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! Commands are looked up in a static table that also declares which persona owns each
//! command and how many arguments it needs; arguments are checked before any handler runs.
//! Every command ends in exactly one reply, including the failure paths.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::application::dispatcher::ReportDispatcher;
use crate::application::parsing::{ParsedCommand, parse_command};
use crate::application::playback::PlaybackController;
use crate::application::reports::ReportStore;
use crate::domain::config::{AppConfig, Persona};
use crate::domain::error::BotError;
use crate::domain::traits::{ChatProvider, MediaResolver};
use crate::interface::commands::{self, Responder};
use crate::strings::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Play,
    Pause,
    Resume,
    Skip,
    Stop,
    Queue,
    NowPlaying,
    Report,
    Status,
    Help,
}

#[derive(Debug, Clone, Copy)]
pub enum ArgSchema {
    /// Arguments are ignored.
    None,
    /// At least `count` tokens; `usage(prefix)` is shown otherwise.
    AtLeast {
        count: usize,
        usage: fn(&str) -> String,
    },
}

impl ArgSchema {
    fn check(&self, cmd: &ParsedCommand, prefix: &str) -> Result<(), BotError> {
        match self {
            ArgSchema::None => Ok(()),
            ArgSchema::AtLeast { count, usage } if cmd.args.len() < *count => {
                Err(BotError::input(usage(prefix)))
            }
            ArgSchema::AtLeast { .. } => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// `None` for commands every persona answers.
    pub persona: Option<Persona>,
    pub kind: CommandKind,
    pub args: ArgSchema,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "play",
        aliases: &["p"],
        persona: Some(Persona::Music),
        kind: CommandKind::Play,
        args: ArgSchema::AtLeast {
            count: 1,
            usage: messages::play_usage,
        },
    },
    CommandSpec {
        name: "pause",
        aliases: &[],
        persona: Some(Persona::Music),
        kind: CommandKind::Pause,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "resume",
        aliases: &[],
        persona: Some(Persona::Music),
        kind: CommandKind::Resume,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "skip",
        aliases: &["next"],
        persona: Some(Persona::Music),
        kind: CommandKind::Skip,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "stop",
        aliases: &["leave"],
        persona: Some(Persona::Music),
        kind: CommandKind::Stop,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "queue",
        aliases: &["q"],
        persona: Some(Persona::Music),
        kind: CommandKind::Queue,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "now_playing",
        aliases: &["np", "nowplaying"],
        persona: Some(Persona::Music),
        kind: CommandKind::NowPlaying,
        args: ArgSchema::None,
    },
    CommandSpec {
        name: "report",
        aliases: &[],
        persona: Some(Persona::Report),
        kind: CommandKind::Report,
        args: ArgSchema::AtLeast {
            count: 3,
            usage: messages::report_usage,
        },
    },
    CommandSpec {
        name: "status",
        aliases: &[],
        persona: Some(Persona::Report),
        kind: CommandKind::Status,
        args: ArgSchema::AtLeast {
            count: 1,
            usage: messages::status_usage,
        },
    },
    CommandSpec {
        name: "help",
        aliases: &["start"],
        persona: None,
        kind: CommandKind::Help,
        args: ArgSchema::None,
    },
];

pub struct CommandRouter {
    config: AppConfig,
    playback: Arc<PlaybackController>,
    resolver: Arc<dyn MediaResolver>,
    reports: Arc<ReportStore>,
    dispatcher: Arc<ReportDispatcher>,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        playback: Arc<PlaybackController>,
        resolver: Arc<dyn MediaResolver>,
        reports: Arc<ReportStore>,
        dispatcher: Arc<ReportDispatcher>,
    ) -> Self {
        Self {
            config,
            playback,
            resolver,
            reports,
            dispatcher,
        }
    }

    /// Finds the command among those of the enabled personas.
    pub fn lookup(&self, name: &str) -> Option<&'static CommandSpec> {
        COMMANDS.iter().find(|spec| {
            spec.matches(name) && spec.persona.is_none_or(|p| self.config.bot.has(p))
        })
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + ?Sized,
    {
        let Some(cmd) = parse_command(
            message,
            &self.config.bot.command_prefix,
            self.config.bot.username.as_deref(),
        ) else {
            return Ok(());
        };

        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}' room='{}'",
            cmd.name,
            cmd.rest(0),
            sender,
            chat.room_id()
        );

        let prefix = self.config.bot.command_prefix.as_str();
        let mut responder = Responder::new(chat, prefix);
        let Some(spec) = self.lookup(&cmd.name) else {
            responder
                .say(&messages::unknown_command(prefix))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(());
        };

        let result = match spec.args.check(&cmd, prefix) {
            Ok(()) => self.dispatch(spec.kind, &cmd, &mut responder, sender).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::info!("Command '{}' in {} failed: {}", cmd.name, chat.room_id(), e);
            responder
                .say(&messages::error_reply(&e))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Ok(())
    }

    async fn dispatch<C>(
        &self,
        kind: CommandKind,
        cmd: &ParsedCommand,
        responder: &mut Responder<'_, C>,
        sender: &str,
    ) -> Result<(), BotError>
    where
        C: ChatProvider + ?Sized,
    {
        let playback = self.playback.as_ref();
        match kind {
            CommandKind::Play => {
                let timeout = Duration::from_secs(self.config.music.resolve_timeout_secs);
                commands::music::handle_play(
                    playback,
                    self.resolver.as_ref(),
                    timeout,
                    responder,
                    &cmd.rest(0),
                )
                .await
            }
            CommandKind::Pause => commands::music::handle_pause(playback, responder).await,
            CommandKind::Resume => commands::music::handle_resume(playback, responder).await,
            CommandKind::Skip => commands::music::handle_skip(playback, responder).await,
            CommandKind::Stop => commands::music::handle_stop(playback, responder).await,
            CommandKind::Queue => commands::music::handle_queue(playback, responder).await,
            CommandKind::NowPlaying => {
                commands::music::handle_now_playing(playback, responder).await
            }
            CommandKind::Report => {
                commands::report::handle_report(
                    &self.reports,
                    &self.dispatcher,
                    responder,
                    sender,
                    cmd,
                )
                .await
            }
            CommandKind::Status => {
                commands::report::handle_status(&self.reports, responder, sender, cmd).await
            }
            CommandKind::Help => commands::help::handle_help(&self.config.bot, responder).await,
        }
    }
}
