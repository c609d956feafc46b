//! # Report Commands
//!
//! Handles `/report` and `/status`.
//! A report is confirmed to the requester first and dispatched to the review channel after,
//! so a delivery failure never undoes an accepted report.

use crate::application::dispatcher::ReportDispatcher;
use crate::application::parsing::{ParsedCommand, normalize_target};
use crate::application::reports::ReportStore;
use crate::domain::error::BotError;
use crate::domain::traits::ChatProvider;
use crate::domain::types::TargetType;
use crate::interface::commands::Responder;
use crate::strings::messages;

pub async fn handle_report<C: ChatProvider + ?Sized>(
    store: &ReportStore,
    dispatcher: &ReportDispatcher,
    responder: &mut Responder<'_, C>,
    sender: &str,
    cmd: &ParsedCommand,
) -> Result<(), BotError> {
    let (Some(kind), Some(raw_target)) = (cmd.args.first(), cmd.args.get(1)) else {
        return Err(BotError::input(messages::report_usage(responder.prefix())));
    };
    let target_type: TargetType = kind.parse()?;
    let target_id = normalize_target(target_type, raw_target)?;
    let reason = cmd.rest(2);

    let report_id = store.create(sender, target_type, &target_id, &reason).await?;
    let report = store
        .get(report_id)
        .await
        .ok_or(BotError::ReportNotFound(report_id))?;

    let confirmation = messages::report_created(&report, responder.prefix());
    if let Err(e) = responder.say(&confirmation).await {
        tracing::warn!("Report #{} accepted but confirmation failed: {}", report_id, e);
    }

    dispatcher.send(report_id).await;
    Ok(())
}

pub async fn handle_status<C: ChatProvider + ?Sized>(
    store: &ReportStore,
    responder: &mut Responder<'_, C>,
    sender: &str,
    cmd: &ParsedCommand,
) -> Result<(), BotError> {
    let raw_id = cmd
        .args
        .first()
        .ok_or_else(|| BotError::input(messages::status_usage(responder.prefix())))?;
    let report_id: u64 = raw_id
        .trim_start_matches('#')
        .parse()
        .map_err(|_| BotError::input(messages::REPORT_ID_NOT_NUMBER))?;

    let report = store.status_for(report_id, sender).await?;
    responder.say(&messages::report_status(&report)).await
}
