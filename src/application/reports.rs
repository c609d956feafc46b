//! # Report Store
//!
//! Append-only table of user-submitted reports keyed by a monotonically increasing id.
//! The table and the id counter share one lock, so ids stay unique and ordered by
//! acceptance even when reports are created concurrently.
//!
//! When a store path is configured, the table is written to JSON after every mutation and
//! reloaded at startup. The counter is persisted with it, so ids are never reused.
//! Writes go to a temporary file that is renamed over the store, and a failed write undoes
//! the in-memory change so memory never runs ahead of disk.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::domain::error::BotError;
use crate::domain::types::{Report, ReportStatus, TargetType};
use crate::strings::messages;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReportTable {
    /// Last id handed out. `0` means none yet.
    last_id: u64,
    #[serde(default)]
    reports: BTreeMap<u64, Report>,
}

impl ReportTable {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report store {}", path.display()))?;
        let mut table: ReportTable = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report store {}", path.display()))?;
        // Never hand out an id already present on disk.
        if let Some(max) = table.reports.keys().next_back() {
            table.last_id = table.last_id.max(*max);
        }
        Ok(table)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize report store")?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace report store {}", path.display()))?;
        Ok(())
    }
}

pub struct ReportStore {
    path: Option<PathBuf>,
    table: Mutex<ReportTable>,
}

impl ReportStore {
    /// Store kept only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            table: Mutex::new(ReportTable::default()),
        }
    }

    /// Loads the store from `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = ReportTable::load(&path)?;
        tracing::info!(
            "Loaded {} reports from {}",
            table.reports.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            table: Mutex::new(table),
        })
    }

    fn persist(&self, table: &ReportTable) -> Result<(), BotError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        table.save(path).map_err(|e| {
            tracing::error!("{:#}", e);
            BotError::external(messages::REPORT_NOT_SAVED)
        })
    }

    /// Records a new pending report and returns its id.
    pub async fn create(
        &self,
        requester_id: &str,
        target_type: TargetType,
        target_id: &str,
        reason: &str,
    ) -> Result<u64, BotError> {
        let target_id = target_id.trim();
        let reason = reason.trim();
        if target_id.is_empty() {
            return Err(BotError::input(messages::MISSING_REPORT_TARGET));
        }
        if reason.is_empty() {
            return Err(BotError::input(messages::MISSING_REPORT_REASON));
        }

        let mut table = self.table.lock().await;
        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.reports.insert(
            id,
            Report {
                id,
                requester_id: requester_id.to_string(),
                target_type,
                target_id: target_id.to_string(),
                reason: reason.to_string(),
                status: ReportStatus::Pending,
                error: None,
                created_at: now,
                updated_at: now,
            },
        );
        // The id stays consumed even if the write fails.
        if let Err(e) = self.persist(&table) {
            table.reports.remove(&id);
            return Err(e);
        }
        tracing::info!(
            "Report #{} created by {} against {} {}",
            id,
            requester_id,
            target_type,
            target_id
        );
        Ok(id)
    }

    pub async fn get(&self, report_id: u64) -> Option<Report> {
        self.table.lock().await.reports.get(&report_id).cloned()
    }

    /// Reads a report on behalf of `requester_id`. Unknown ids are reported the same way as
    /// reports owned by someone else.
    pub async fn status_for(&self, report_id: u64, requester_id: &str) -> Result<Report, BotError> {
        match self.get(report_id).await {
            Some(report) if report.requester_id == requester_id => Ok(report),
            _ => Err(BotError::Unauthorized(report_id)),
        }
    }

    /// Moves a pending report into a terminal status. Transitions are one-shot.
    pub async fn update_status(
        &self,
        report_id: u64,
        status: ReportStatus,
        error: Option<String>,
    ) -> Result<Report, BotError> {
        let mut table = self.table.lock().await;
        let report = table
            .reports
            .get_mut(&report_id)
            .ok_or(BotError::ReportNotFound(report_id))?;

        if report.status.is_terminal() || !status.is_terminal() {
            return Err(BotError::InvalidTransition {
                id: report_id,
                status: report.status,
            });
        }

        let previous = report.clone();
        report.status = status;
        report.error = error;
        report.updated_at = Utc::now();
        let updated = report.clone();
        if let Err(e) = self.persist(&table) {
            table.reports.insert(report_id, previous);
            return Err(e);
        }
        tracing::info!("Report #{} is now {}", report_id, status);
        Ok(updated)
    }
}

#[cfg(test)]
impl ReportStore {
    pub(crate) async fn len(&self) -> usize {
        self.table.lock().await.reports.len()
    }
}
