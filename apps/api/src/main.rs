mod config;
mod errors;
mod interview;
mod models;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::session::SessionStore;
use crate::interview::speech::{LogSpeech, SpeechSink, WebhookSpeech};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Speech backend (LogSpeech unless a webhook is configured)
    let speech: Arc<dyn SpeechSink> = match &config.speech_webhook_url {
        Some(url) => {
            info!("Speech webhook enabled: {url}");
            Arc::new(WebhookSpeech::new(url.clone()))
        }
        None => {
            info!("No SPEECH_WEBHOOK_URL set; coach utterances will be logged");
            Arc::new(LogSpeech)
        }
    };

    info!(
        "Evaluation mode: {:?}, reply delay: {}ms",
        config.evaluation_mode,
        config.reply_delay.as_millis()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions: SessionStore::new(),
        speech,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
