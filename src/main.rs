//! Emergency Hub - report relay server

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emergency_hub::{
    api::{self, RelayState},
    app::EmergencyApp,
    config::Config,
    services::{ReportMailer, SmtpMailer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emergency_hub=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Emergency Hub...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let app = EmergencyApp::from_config(&config)?;

    // Keep headlines fresh in the background
    let _news_task = app.news.clone().map(|feed| feed.spawn_polling());

    if config.mail.to.is_empty() {
        tracing::warn!("No report recipients configured; relayed reports will fail");
    }
    let mailer = SmtpMailer::from_config(&config.mail)?;
    let state = RelayState {
        report_mailer: Arc::new(ReportMailer::new(Arc::new(mailer), &config.mail)),
        anon_key: config.relay.anon_key.clone(),
    };

    // Build router
    let router = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
