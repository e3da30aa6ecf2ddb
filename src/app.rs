//! Application root
//!
//! [`EmergencyApp`] owns one instance of every store and wires them to the
//! configured storage, submitter and latencies.

use anyhow::Result;
use std::sync::Arc;

use crate::config::{Config, LatencyConfig};
use crate::models::{InvalidReportForm, ReportForm};
use crate::services::{
    create_submitter, AuthStore, AuthVariant, EmergencyLatency, EmergencyStore, GuidelinesLatency,
    GuidelinesStore, Latency, NewsFeed, ProfileStore,
};
use crate::storage::create_storage;

pub struct EmergencyApp {
    pub auth: AuthStore,
    pub emergency: EmergencyStore,
    pub guidelines: GuidelinesStore,
    pub profiles: ProfileStore,
    /// Present when the news feed is enabled
    pub news: Option<Arc<NewsFeed>>,
}

impl EmergencyApp {
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = create_storage(&config.storage)?;
        let latency = &config.latency;

        let auth = AuthStore::new(
            AuthVariant::from_config(&config.auth),
            storage.clone(),
            Latency::from_millis(latency.auth_ms),
        );
        let emergency = EmergencyStore::new(create_submitter(&config.relay), emergency_latency(latency));
        let guidelines = GuidelinesStore::new(guidelines_latency(latency));
        let profiles = ProfileStore::new(storage, Latency::from_millis(latency.profile_ms));
        let news = config
            .news
            .enabled
            .then(|| Arc::new(NewsFeed::new(config.news.clone())));

        tracing::info!(
            "Application initialized (auth: {:?}, signed in: {})",
            config.auth.variant,
            auth.is_authenticated()
        );

        Ok(Self {
            auth,
            emergency,
            guidelines,
            profiles,
            news,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Load alerts and, when signed in, the user's reports concurrently.
    pub async fn load_dashboard(&self) {
        match self.auth.current_user() {
            Some(user) => {
                futures::join!(
                    self.emergency.fetch_alerts(),
                    self.emergency.fetch_user_reports(&user.id)
                );
            }
            None => self.emergency.fetch_alerts().await,
        }
    }

    /// Validate the report form and submit it on behalf of the signed-in
    /// user. Submission failures land on the emergency store's error.
    pub async fn submit_form(&self, form: &ReportForm) -> Result<(), InvalidReportForm> {
        let user_id = self.auth.current_user().map(|u| u.id).unwrap_or_default();
        let draft = form.validate(&user_id)?;
        self.emergency.submit_report(draft).await;
        Ok(())
    }
}

fn emergency_latency(config: &LatencyConfig) -> EmergencyLatency {
    EmergencyLatency {
        alerts: Latency::from_millis(config.alerts_ms),
        reports: Latency::from_millis(config.reports_ms),
    }
}

fn guidelines_latency(config: &LatencyConfig) -> GuidelinesLatency {
    GuidelinesLatency {
        categories: Latency::from_millis(config.categories_ms),
        guidelines: Latency::from_millis(config.guidelines_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthVariantKind, StorageDriver};
    use crate::models::EmergencyType;

    fn config() -> Config {
        let mut config = Config::default();
        config.storage.driver = StorageDriver::Memory;
        config.auth.variant = AuthVariantKind::Fixture;
        config.latency = LatencyConfig::none();
        config
    }

    fn form() -> ReportForm {
        ReportForm {
            kind: EmergencyType::Fire.to_string(),
            description: "Smoke from the third floor".into(),
            location: "7 Marina Road".into(),
            contact: "Ada".into(),
            phone: "0803 123 4567".into(),
        }
    }

    #[tokio::test]
    async fn test_dashboard_after_login() {
        let app = EmergencyApp::from_config(&config()).unwrap();
        assert!(!app.is_authenticated());
        assert!(app.news.is_none());

        app.auth.login("jane@example.com", "password123").await;
        assert!(app.is_authenticated());

        app.load_dashboard().await;
        let state = app.emergency.snapshot();
        assert_eq!(state.alerts.len(), 4);
        assert_eq!(state.user_reports.len(), 2);
        assert!(!state.status.is_loading);
    }

    #[tokio::test]
    async fn test_dashboard_signed_out_loads_alerts_only() {
        let app = EmergencyApp::from_config(&config()).unwrap();

        app.load_dashboard().await;

        let state = app.emergency.snapshot();
        assert_eq!(state.alerts.len(), 4);
        assert!(state.user_reports.is_empty());
    }

    #[tokio::test]
    async fn test_submit_form_appends_report_for_current_user() {
        let app = EmergencyApp::from_config(&config()).unwrap();
        app.auth.login("jane@example.com", "password123").await;

        app.submit_form(&form()).await.unwrap();

        let reports = app.emergency.snapshot().user_reports;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].user_id, "1");
        assert_eq!(reports[0].kind, "Fire");
        assert_eq!(reports[0].contact, "Ada (0803 123 4567)");
    }

    #[tokio::test]
    async fn test_submit_invalid_form_touches_nothing() {
        let app = EmergencyApp::from_config(&config()).unwrap();
        let mut form = form();
        form.phone = "12345".into();

        let err = app.submit_form(&form).await.unwrap_err();

        assert!(err.get("phone").is_some());
        assert!(app.emergency.snapshot().user_reports.is_empty());
        assert_eq!(app.emergency.error(), None);
    }

    #[tokio::test]
    async fn test_submit_form_signed_out_sets_store_error() {
        let app = EmergencyApp::from_config(&config()).unwrap();

        app.submit_form(&form()).await.unwrap();

        assert_eq!(app.emergency.error().as_deref(), Some("A report must belong to a user"));
    }

    #[test]
    fn test_news_feed_created_when_enabled() {
        let mut config = config();
        config.news.enabled = true;

        let app = EmergencyApp::from_config(&config).unwrap();

        assert!(app.news.is_some());
    }
}
