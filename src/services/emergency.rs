//! Emergency store
//!
//! Holds the alert list and the current user's reports. Fetches return
//! fixture data after a simulated delay; submissions go through a
//! [`ReportSubmitter`] and, once accepted, are appended locally as pending.
//! Reports are kept in memory only.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::fixtures;
use crate::models::{EmergencyAlert, EmergencyReport, ReportDraft, ReportStatus};
use crate::services::store::{HasStatus, Latency, OperationStatus, Store};
use crate::services::submitter::{ReportSubmitter, SubmitError};

/// Error types for report operations
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("A report must belong to a user")]
    MissingUser,

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Delays of the emergency store operations
#[derive(Debug, Clone, Copy, Default)]
pub struct EmergencyLatency {
    pub alerts: Latency,
    pub reports: Latency,
}

/// Observable state of the emergency store
#[derive(Debug, Clone, Default)]
pub struct EmergencyState {
    pub alerts: Vec<EmergencyAlert>,
    pub user_reports: Vec<EmergencyReport>,
    pub status: OperationStatus,
}

impl HasStatus for EmergencyState {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut OperationStatus {
        &mut self.status
    }
}

impl EmergencyState {
    pub fn active_alerts(&self) -> impl Iterator<Item = &EmergencyAlert> {
        self.alerts.iter().filter(|a| a.is_active)
    }

    pub fn resolved_alerts(&self) -> impl Iterator<Item = &EmergencyAlert> {
        self.alerts.iter().filter(|a| !a.is_active)
    }
}

/// Emergency store
pub struct EmergencyStore {
    state: Store<EmergencyState>,
    submitter: Arc<dyn ReportSubmitter>,
    latency: EmergencyLatency,
    /// Reference instant of the fixture timestamps
    fixtures_at: DateTime<Utc>,
}

impl EmergencyStore {
    pub fn new(submitter: Arc<dyn ReportSubmitter>, latency: EmergencyLatency) -> Self {
        Self {
            state: Store::new(EmergencyState::default()),
            submitter,
            latency,
            fixtures_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> EmergencyState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<EmergencyState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Replace the alert list with the published alerts.
    pub async fn fetch_alerts(&self) {
        self.state.begin();
        self.latency.alerts.wait().await;

        let alerts = fixtures::alerts(self.fixtures_at);
        tracing::debug!("Fetched {} alerts", alerts.len());
        self.state.update(|s| {
            s.alerts = alerts;
            s.status.succeed();
        });
    }

    /// Replace the report list with the reports filed by `user_id`.
    pub async fn fetch_user_reports(&self, user_id: &str) {
        self.state.begin();
        self.latency.reports.wait().await;

        let reports: Vec<EmergencyReport> = fixtures::reports(self.fixtures_at)
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        tracing::debug!("Fetched {} reports for user {}", reports.len(), user_id);
        self.state.update(|s| {
            s.user_reports = reports;
            s.status.succeed();
        });
    }

    /// Submit a report and, once accepted, append it as pending.
    pub async fn submit_report(&self, draft: ReportDraft) {
        self.state.begin();

        match self.forward(&draft).await {
            Ok(()) => {
                let report = self.state.update(|s| {
                    let report = new_report(draft, s.user_reports.last());
                    s.user_reports.push(report.clone());
                    s.status.succeed();
                    report
                });
                tracing::info!("Report {} ({}) submitted by user {}", report.id, report.kind, report.user_id);
            }
            Err(e) => {
                tracing::warn!("Report submission failed: {}", error_chain(&e));
                self.state.fail(e);
            }
        }
    }

    async fn forward(&self, draft: &ReportDraft) -> Result<(), ReportError> {
        if draft.user_id.trim().is_empty() {
            return Err(ReportError::MissingUser);
        }
        self.submitter.submit(&draft.details()).await?;
        Ok(())
    }
}

/// Render an error followed by its sources, `outer: inner: ...`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Build the stored report. Timestamps never go backwards relative to the
/// last report in the list.
fn new_report(draft: ReportDraft, last: Option<&EmergencyReport>) -> EmergencyReport {
    let now = Utc::now();
    let timestamp = match last {
        Some(prev) if prev.timestamp > now => prev.timestamp,
        _ => now,
    };

    EmergencyReport {
        id: Uuid::new_v4().to_string(),
        user_id: draft.user_id,
        kind: draft.kind,
        description: draft.description,
        location: draft.location,
        status: ReportStatus::Pending,
        timestamp,
        contact: draft.contact,
    }
}
