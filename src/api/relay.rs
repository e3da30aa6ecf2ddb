//! Report relay endpoint
//!
//! `POST /functions/v1/send-report` accepts `{ "report": { ... } }` and
//! emails it to the responders.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error::RelayError, RelayState};
use crate::models::ReportEnvelope;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSent {
    pub message: String,
    pub email_id: String,
}

/// The body is taken raw so a malformed payload is reported like any other
/// processing failure.
pub async fn send_report(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReportSent>, RelayError> {
    if let Some(expected) = &state.anon_key {
        if bearer_token(&headers) != Some(expected.as_str()) {
            tracing::warn!("Rejected report with missing or invalid bearer token");
            return Err(RelayError::Unauthorized);
        }
    }

    let ReportEnvelope { report } = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Invalid report payload: {}", e);
        RelayError::Processing(e.to_string())
    })?;

    let email_id = state.report_mailer.send_report(&report).await.map_err(|e| {
        tracing::error!("Failed to relay '{}' report: {:#}", report.kind, e);
        RelayError::Processing(format!("{:#}", e))
    })?;

    Ok(Json(ReportSent {
        message: "Report submitted and email sent successfully".to_string(),
        email_id,
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::config::MailConfig;
    use crate::services::email::testing::RecordingMailer;
    use crate::services::ReportMailer;
    use axum::http::{HeaderValue, Method, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    const PATH: &str = "/functions/v1/send-report";

    fn server(mailer: Arc<RecordingMailer>, anon_key: Option<&str>) -> TestServer {
        let config = MailConfig {
            to: vec!["responders@example.com".into()],
            ..MailConfig::default()
        };
        let state = RelayState {
            report_mailer: Arc::new(ReportMailer::new(mailer, &config)),
            anon_key: anon_key.map(str::to_string),
        };
        TestServer::new(build_router(state)).unwrap()
    }

    fn payload() -> serde_json::Value {
        json!({
            "report": {
                "type": "Fire",
                "description": "Smoke coming from the third floor",
                "location": "7 Marina Road",
                "contact": "Ada (08031234567)"
            }
        })
    }

    #[tokio::test]
    async fn test_send_report_success() {
        let mailer = Arc::new(RecordingMailer::default());
        let server = server(mailer.clone(), None);

        let response = server.post(PATH).json(&payload()).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Report submitted and email sent successfully");
        assert_eq!(body["emailId"], "email-1");
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "URGENT: New Emergency Report - Fire");
    }

    #[tokio::test]
    async fn test_malformed_body_is_processing_error() {
        let mailer = Arc::new(RecordingMailer::default());
        let server = server(mailer.clone(), None);

        let response = server.post(PATH).text("{not json").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to process emergency report");
        assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mailer_failure_is_reported() {
        let server = server(Arc::new(RecordingMailer::failing("smtp unavailable")), None);

        let response = server.post(PATH).json(&payload()).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to process emergency report");
        assert_eq!(body["details"], "smtp unavailable");
    }

    #[tokio::test]
    async fn test_bearer_token_is_checked_when_configured() {
        let mailer = Arc::new(RecordingMailer::default());
        let server = server(mailer.clone(), Some("anon"));

        let missing = server.post(PATH).json(&payload()).await;
        missing.assert_status(StatusCode::UNAUTHORIZED);

        let wrong = server
            .post(PATH)
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"))
            .json(&payload())
            .await;
        wrong.assert_status(StatusCode::UNAUTHORIZED);

        let ok = server
            .post(PATH)
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer anon"))
            .json(&payload())
            .await;
        ok.assert_status_ok();
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_with_cors_headers() {
        let server = server(Arc::new(RecordingMailer::default()), Some("anon"));

        let response = server
            .method(Method::OPTIONS, PATH)
            .add_header(header::ORIGIN, HeaderValue::from_static("https://portal.example"))
            .add_header(
                header::ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("POST"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
        let methods = response.header(header::ACCESS_CONTROL_ALLOW_METHODS);
        assert!(methods.to_str().unwrap().contains("POST"));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }
}
