//! Report submission
//!
//! The emergency store hands every new report to a [`ReportSubmitter`]
//! before keeping it locally. `LocalSubmitter` accepts everything without
//! I/O; `HttpReportSubmitter` POSTs `{ "report": { ... } }` to the relay with
//! a bearer token. There is no retry and no timeout: a failed submission has
//! to be resubmitted by the caller.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::models::{ReportDetails, ReportEnvelope};

/// Error types for report submission
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The relay answered with a non-success status
    #[error("Failed to submit report")]
    Rejected { status: u16 },

    /// The request never got an answer
    #[error("Failed to submit report")]
    Transport(#[from] reqwest::Error),
}

/// Destination of submitted reports
#[async_trait]
pub trait ReportSubmitter: Send + Sync {
    async fn submit(&self, report: &ReportDetails) -> Result<(), SubmitError>;
}

/// Keeps reports local; always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSubmitter;

#[async_trait]
impl ReportSubmitter for LocalSubmitter {
    async fn submit(&self, report: &ReportDetails) -> Result<(), SubmitError> {
        tracing::debug!("Keeping '{}' report local", report.kind);
        Ok(())
    }
}

/// Forwards reports to the relay endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReportSubmitter {
    client: reqwest::Client,
    endpoint: String,
    anon_key: Option<String>,
}

impl HttpReportSubmitter {
    pub fn new(endpoint: impl Into<String>, anon_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            anon_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportSubmitter for HttpReportSubmitter {
    async fn submit(&self, report: &ReportDetails) -> Result<(), SubmitError> {
        let body = ReportEnvelope {
            report: report.clone(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.anon_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Relay rejected report with status {}", status);
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!("Relay accepted '{}' report", report.kind);
        Ok(())
    }
}

/// Pick the submitter for a relay configuration
pub fn create_submitter(config: &RelayConfig) -> Arc<dyn ReportSubmitter> {
    match &config.endpoint {
        Some(endpoint) => {
            tracing::info!("Submitting reports to {}", endpoint);
            Arc::new(HttpReportSubmitter::new(endpoint.clone(), config.anon_key.clone()))
        }
        None => {
            tracing::info!("No relay endpoint configured, reports stay local");
            Arc::new(LocalSubmitter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use std::sync::Mutex;

    fn details() -> ReportDetails {
        ReportDetails {
            kind: "Fire".into(),
            description: "Smoke from the third floor".into(),
            location: "7 Marina Road".into(),
            contact: "Ada (0803 123 4567)".into(),
        }
    }

    /// Serve `router` on an ephemeral loopback port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_local_submitter_accepts() {
        assert!(LocalSubmitter.submit(&details()).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_submitter_posts_envelope_with_bearer() {
        let seen: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>> = Arc::default();
        let sink = seen.clone();
        let router = Router::new().route(
            "/send-report",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    sink.lock().unwrap().push((auth, body));
                    StatusCode::OK
                }
            }),
        );
        let base = serve(router).await;

        let submitter = HttpReportSubmitter::new(format!("{}/send-report", base), Some("anon".into()));
        submitter.submit(&details()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer anon"));
        assert_eq!(seen[0].1["report"]["type"], "Fire");
        assert_eq!(seen[0].1["report"]["contact"], "Ada (0803 123 4567)");
    }

    #[tokio::test]
    async fn test_http_submitter_non_success_is_rejected() {
        let router = Router::new().route(
            "/send-report",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve(router).await;

        let submitter = HttpReportSubmitter::new(format!("{}/send-report", base), None);
        let err = submitter.submit(&details()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Rejected { status: 500 }));
        assert_eq!(err.to_string(), "Failed to submit report");
    }

    #[tokio::test]
    async fn test_http_submitter_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let submitter = HttpReportSubmitter::new(format!("http://{}/send-report", addr), None);
        let err = submitter.submit(&details()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(err.to_string(), "Failed to submit report");
        assert!(std::error::Error::source(&err).is_some());
    }
}
