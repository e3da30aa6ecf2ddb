//! Emergency alert model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity tag of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Danger,
    Info,
    Success,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Danger => write!(f, "danger"),
            AlertKind::Info => write!(f, "info"),
            AlertKind::Success => write!(f, "success"),
        }
    }
}

impl FromStr for AlertKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" => Ok(AlertKind::Warning),
            "danger" => Ok(AlertKind::Danger),
            "info" => Ok(AlertKind::Info),
            "success" => Ok(AlertKind::Success),
            _ => Err(anyhow::anyhow!("Invalid alert kind: {}", s)),
        }
    }
}

/// A broadcast alert shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_kind_roundtrips_through_str() {
        for kind in [AlertKind::Warning, AlertKind::Danger, AlertKind::Info, AlertKind::Success] {
            assert_eq!(kind.to_string().parse::<AlertKind>().unwrap(), kind);
        }
        assert!("critical".parse::<AlertKind>().is_err());
    }

    #[test]
    fn test_alert_serializes_type_field() {
        let alert = EmergencyAlert {
            id: "1".into(),
            kind: AlertKind::Danger,
            title: "Flood".into(),
            message: "Stay indoors".into(),
            location: None,
            timestamp: Utc::now(),
            is_active: true,
        };
        let json = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["type"], "danger");
        assert_eq!(json["isActive"], true);
        assert!(json.get("location").is_none());
    }
}
