//! Guidelines store
//!
//! Read-only reference data: categories and the guidelines under them.

use tokio::sync::watch;

use crate::fixtures::{CATEGORIES, GUIDELINES};
use crate::models::{Guideline, GuidelineCategory};
use crate::services::store::{HasStatus, Latency, OperationStatus, Store};

/// Delays of the guidelines store operations
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidelinesLatency {
    pub categories: Latency,
    pub guidelines: Latency,
}

/// Observable state of the guidelines store
#[derive(Debug, Clone, Default)]
pub struct GuidelinesState {
    pub categories: Vec<GuidelineCategory>,
    pub guidelines: Vec<Guideline>,
    pub status: OperationStatus,
}

impl HasStatus for GuidelinesState {
    fn status(&self) -> &OperationStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut OperationStatus {
        &mut self.status
    }
}

/// Guidelines store
pub struct GuidelinesStore {
    state: Store<GuidelinesState>,
    latency: GuidelinesLatency,
}

impl GuidelinesStore {
    pub fn new(latency: GuidelinesLatency) -> Self {
        Self {
            state: Store::new(GuidelinesState::default()),
            latency,
        }
    }

    pub fn snapshot(&self) -> GuidelinesState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<GuidelinesState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub async fn fetch_categories(&self) {
        self.state.begin();
        self.latency.categories.wait().await;

        let categories = CATEGORIES.clone();
        self.state.update(|s| {
            s.categories = categories;
            s.status.succeed();
        });
    }

    /// Load guidelines, restricted to `category_id` when given.
    pub async fn fetch_guidelines(&self, category_id: Option<&str>) {
        self.state.begin();
        self.latency.guidelines.wait().await;

        let guidelines: Vec<Guideline> = match category_id {
            Some(id) => GUIDELINES.iter().filter(|g| g.category_id == id).cloned().collect(),
            None => GUIDELINES.clone(),
        };
        tracing::debug!("Fetched {} guidelines (category: {:?})", guidelines.len(), category_id);
        self.state.update(|s| {
            s.guidelines = guidelines;
            s.status.succeed();
        });
    }
}

/// Guidelines whose title or steps contain `term`, ignoring case.
pub fn search_guidelines<'a>(guidelines: &'a [Guideline], term: &str) -> Vec<&'a Guideline> {
    guidelines.iter().filter(|g| g.matches(term)).collect()
}
