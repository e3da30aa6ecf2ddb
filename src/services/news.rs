//! Emergency news feed
//!
//! Polls a news search API for emergency-related headlines. A failed refresh
//! keeps the articles of the last successful one.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::NewsConfig;
use crate::models::{NewsArticle, NewsResponse};
use crate::services::store::{HasStatus, OperationStatus, Store};

#[derive(Debug, Clone, Default)]
pub struct NewsState {
    pub articles: Vec<NewsArticle>,
    pub last_updated: Option<DateTime<Utc>>,
    pub status: OperationStatus,
}

impl HasStatus for NewsState {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut OperationStatus {
        &mut self.status
    }
}

/// News feed client
pub struct NewsFeed {
    client: reqwest::Client,
    config: NewsConfig,
    state: Store<NewsState>,
}

impl NewsFeed {
    pub fn new(config: NewsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            state: Store::new(NewsState::default()),
        }
    }

    pub fn snapshot(&self) -> NewsState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<NewsState> {
        self.state.subscribe()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Fetch the latest headlines.
    pub async fn refresh(&self) {
        self.state.begin();

        match self.fetch().await {
            Ok(response) => {
                tracing::debug!("Fetched {} news articles", response.articles.len());
                self.state.update(|s| {
                    s.articles = response.articles;
                    s.last_updated = Some(Utc::now());
                    s.status.succeed();
                });
            }
            Err(e) => {
                tracing::warn!("News refresh failed: {}", e);
                self.state.fail("Failed to fetch news");
            }
        }
    }

    async fn fetch(&self) -> Result<NewsResponse, reqwest::Error> {
        self.client
            .get(&self.config.base_url)
            .query(&[
                ("q", self.config.keywords.as_str()),
                ("country", self.config.country.as_str()),
                ("lang", self.config.lang.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Refresh now and then on every configured interval.
    pub fn spawn_polling(self: Arc<Self>) -> JoinHandle<()> {
        let period = self.config.interval();
        tracing::info!("Polling news every {}s", period.as_secs());
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.refresh().await;
            }
        })
    }
}
