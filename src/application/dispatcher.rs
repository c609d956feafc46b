//! # Report Dispatcher
//!
//! Delivers a freshly created report to the review channel and records the outcome.
//! One best-effort attempt per report: a failed delivery is stored as the `failed` status
//! with its error text and is never retried here.

use std::sync::Arc;
use std::time::Duration;

use crate::application::reports::ReportStore;
use crate::domain::traits::NotificationChannel;
use crate::domain::types::{Report, ReportStatus};

pub struct ReportDispatcher {
    store: Arc<ReportStore>,
    channel: Arc<dyn NotificationChannel>,
    timeout: Duration,
}

impl ReportDispatcher {
    pub fn new(
        store: Arc<ReportStore>,
        channel: Arc<dyn NotificationChannel>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            channel,
            timeout,
        }
    }

    /// Sends the report and returns its final state. Errors never escape this call.
    pub async fn send(&self, report_id: u64) -> Option<Report> {
        let Some(report) = self.store.get(report_id).await else {
            tracing::warn!("Report #{} vanished before dispatch", report_id);
            return None;
        };
        if report.status.is_terminal() {
            tracing::warn!("Report #{} already {}, not resending", report_id, report.status);
            return Some(report);
        }

        let summary = crate::strings::messages::report_summary(&report);
        let outcome = match tokio::time::timeout(self.timeout, self.channel.deliver(&summary)).await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(format!(
                "delivery timed out after {}s",
                self.timeout.as_secs()
            )),
        };

        let result = match outcome {
            Ok(()) => {
                self.store
                    .update_status(report_id, ReportStatus::Completed, None)
                    .await
            }
            Err(e) => {
                tracing::error!("Failed to deliver report #{}: {}", report_id, e);
                self.store
                    .update_status(report_id, ReportStatus::Failed, Some(e))
                    .await
            }
        };

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Could not record outcome of report #{}: {}", report_id, e);
                self.store.get(report_id).await
            }
        }
    }
}
