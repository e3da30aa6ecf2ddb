//! Emergency report model
//!
//! Contains the stored report, the draft handed to the emergency store, the
//! wire shape sent to the relay, and the form input with its validation rules.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Minimum description length accepted by the report form
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Mobile numbers: 0, then 7/8/9, then 0/1, then eight digits.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[789][01]\d{8}$").expect("phone pattern is valid"));

/// Lifecycle of a report. Only `Pending` is assigned here; responders move
/// reports forward out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "inProgress"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// A report filed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyReport {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub location: String,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    pub contact: String,
}

/// A report before the store assigns id, timestamp and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub location: String,
    pub contact: String,
}

impl ReportDraft {
    /// The fields forwarded to the relay.
    pub fn details(&self) -> ReportDetails {
        ReportDetails {
            kind: self.kind.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            contact: self.contact.clone(),
        }
    }
}

/// Report fields carried over the wire to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub location: String,
    pub contact: String,
}

/// Request body of the relay: `{ "report": { ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub report: ReportDetails,
}

/// Emergency categories offered by the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyType {
    Fire,
    Medical,
    Flooding,
    GasLeak,
    PowerOutage,
    DownedPowerLine,
    TrafficAccident,
    StructuralDamage,
    Other,
}

impl EmergencyType {
    pub const ALL: [EmergencyType; 9] = [
        EmergencyType::Fire,
        EmergencyType::Medical,
        EmergencyType::Flooding,
        EmergencyType::GasLeak,
        EmergencyType::PowerOutage,
        EmergencyType::DownedPowerLine,
        EmergencyType::TrafficAccident,
        EmergencyType::StructuralDamage,
        EmergencyType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EmergencyType::Fire => "Fire",
            EmergencyType::Medical => "Medical Emergency",
            EmergencyType::Flooding => "Flooding",
            EmergencyType::GasLeak => "Gas Leak",
            EmergencyType::PowerOutage => "Power Outage",
            EmergencyType::DownedPowerLine => "Downed Power Line",
            EmergencyType::TrafficAccident => "Traffic Accident",
            EmergencyType::StructuralDamage => "Structural Damage",
            EmergencyType::Other => "Other",
        }
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw input of the report form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub phone: String,
}

/// Field name to message, one entry per invalid field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Report form has {} invalid field(s)", .0.len())]
pub struct InvalidReportForm(pub BTreeMap<&'static str, String>);

impl InvalidReportForm {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl ReportForm {
    /// Validate the form and build a draft owned by `user_id`.
    ///
    /// The draft's contact is `"<name> (<phone>)"`.
    pub fn validate(&self, user_id: &str) -> Result<ReportDraft, InvalidReportForm> {
        let mut errors = BTreeMap::new();

        if self.kind.trim().is_empty() {
            errors.insert("type", "Please select an emergency type".to_string());
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.insert("description", "Please provide a description".to_string());
        } else if description.chars().count() < MIN_DESCRIPTION_LEN {
            errors.insert(
                "description",
                format!("Description must be at least {} characters", MIN_DESCRIPTION_LEN),
            );
        }

        if self.location.trim().is_empty() {
            errors.insert("location", "Please provide a location".to_string());
        }

        if self.contact.trim().is_empty() {
            errors.insert("contact", "Please provide a contact name".to_string());
        }

        let phone: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if phone.is_empty() {
            errors.insert("phone", "Please provide a phone number".to_string());
        } else if !PHONE_PATTERN.is_match(&phone) {
            errors.insert(
                "phone",
                "Please enter a valid Nigerian phone number (e.g., 0803 123 4567)".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(InvalidReportForm(errors));
        }

        Ok(ReportDraft {
            user_id: user_id.to_string(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            contact: format!("{} ({})", self.contact, self.phone),
        })
    }
}
