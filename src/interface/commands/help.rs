//! # Help Command
//!
//! Handles the `/help` command.
//! Displays the help of every enabled persona.

use crate::domain::config::{BotConfig, Persona};
use crate::domain::error::BotError;
use crate::domain::traits::ChatProvider;
use crate::interface::commands::Responder;

pub async fn handle_help<C: ChatProvider + ?Sized>(
    bot: &BotConfig,
    responder: &mut Responder<'_, C>,
) -> Result<(), BotError> {
    let mut sections = Vec::new();
    if bot.has(Persona::Music) {
        sections.push(crate::strings::help::MUSIC);
    }
    if bot.has(Persona::Report) {
        sections.push(crate::strings::help::REPORT);
    }
    let text = sections.join("\n").replace('/', responder.prefix());
    responder.say(&text).await
}
