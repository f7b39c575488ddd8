//! Application state shared across handlers.

use std::sync::Arc;

use calendar::CalendarClient;
use gemini_brain::GeminiBrain;
use scheduler::{ReplyCorrelator, SchedulingEngine};
use sms_gateway::SmsClient;

/// The concrete engine type wired in production.
pub type Engine = SchedulingEngine<SmsClient, CalendarClient, GeminiBrain>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Scheduling engine (one per process; owns the pass guard).
    pub engine: Arc<Engine>,
    /// Reply correlator.
    pub correlator: ReplyCorrelator,
    /// Scheduling trigger secret.
    pub cron_secret: Option<String>,
    /// Inbound webhook secret.
    pub poller_secret: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        engine: Engine,
        correlator: ReplyCorrelator,
        cron_secret: Option<String>,
        poller_secret: Option<String>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            correlator,
            cron_secret,
            poller_secret,
        }
    }
}
