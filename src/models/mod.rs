//! Data models
//!
//! This module contains the data structures shared by the stores, the
//! fixtures and the report relay:
//! - Users and sessions
//! - Emergency alerts and reports (plus the report form and its wire shape)
//! - Guideline categories and guidelines
//! - Profiles and news articles

mod alert;
mod guideline;
mod news;
mod profile;
mod report;
mod session;
mod user;

pub use alert::{AlertKind, EmergencyAlert};
pub use guideline::{Guideline, GuidelineCategory, GuidelineIcon};
pub use news::{NewsArticle, NewsResponse, NewsSource};
pub use profile::{NotificationPreferences, Profile};
pub use report::{
    EmergencyReport, EmergencyType, InvalidReportForm, ReportDetails, ReportDraft, ReportEnvelope,
    ReportForm, ReportStatus, MIN_DESCRIPTION_LEN,
};
pub use session::Session;
pub use user::User;
