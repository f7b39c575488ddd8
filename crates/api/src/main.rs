//! HTTP entry points for the Jot scheduler.
//!
//! Wires together the database, the SMS gateway, and the optional
//! calendar/generator capabilities, then exposes the scheduling trigger and
//! the inbound-message webhook.

mod config;
mod error;
mod routes;
mod state;

use calendar::{CalendarClient, CalendarConfig};
use database::Database;
use gemini_brain::{GeminiBrain, GeminiConfig};
use scheduler::{PromptChain, ReplyCorrelator, SchedulingEngine};
use sms_gateway::{GatewayConfig, SmsClient};
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Jot API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Connect to the SMS gateway
    let gateway = SmsClient::connect(GatewayConfig::new(&config.sms_gateway_url)).await?;

    // Optional capabilities: the chain skips absent tiers.
    let cal = if CalendarConfig::is_configured() {
        info!("Calendar personalization enabled");
        Some(CalendarClient::from_env()?)
    } else {
        info!("Calendar personalization disabled (no Google credentials)");
        None
    };

    let brain = if GeminiConfig::is_configured() {
        info!("Prompt generation enabled");
        Some(GeminiBrain::from_env()?)
    } else {
        info!("Prompt generation disabled (no GEMINI_API_KEY)");
        None
    };

    // Build the scheduling core
    let chain = PromptChain::new(db.clone(), cal, brain);
    let engine = SchedulingEngine::new(db.clone(), gateway, chain);
    let correlator = ReplyCorrelator::new(db);

    // Build application state and router
    let state = AppState::new(engine, correlator, config.cron_secret, config.poller_secret);
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
