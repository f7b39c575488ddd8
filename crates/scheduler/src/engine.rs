//! Scheduling Decision Engine.
//!
//! Runs one pass per external tick (the reference cadence is once per
//! minute): scans every verified user, decides who is due right now in
//! their own timezone, generates and sends their prompt, and records the
//! delivery state. Users are processed independently; one user's failure
//! never aborts the rest of the pass.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use database::{user, Database, User};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chain::PromptChain;
use crate::error::{Result, SchedulerError};
use crate::traits::{EventSource, OutboundSms, PromptGenerator};

/// Send window half-width for "on" mode: near-exact, tolerating tick jitter.
pub const ON_WINDOW_MINUTES: i64 = 1;

/// Send window half-width for "around" mode. Eligibility across the wide
/// band plus the once-per-day guard yields a different effective send
/// minute each day without any stored randomization state.
pub const AROUND_WINDOW_MINUTES: i64 = 20;

/// Concurrent per-user units of work within a pass. Doubles as the bound on
/// in-flight outbound sends.
const PASS_CONCURRENCY: usize = 4;

/// Aggregate result of one scheduling pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassSummary {
    /// Number of prompts handed to the transport.
    pub sent: usize,
    /// Per-user error strings (config problems, send failures).
    pub errors: Vec<String>,
    /// Per-user skip diagnostics (duplicates); not errors.
    pub skipped: Vec<String>,
}

/// Outcome of the per-user scheduling decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// In the send window with no prompt sent today.
    Send,
    /// In the send window but a prompt already went out today.
    AlreadySentToday,
    /// Outside the send window.
    OutOfWindow,
}

enum UserOutcome {
    Sent,
    Idle,
    Skipped(String),
    Error(String),
}

/// Decide whether `user` is due at `now`.
///
/// Pure function over the user's schedule config and delivery state;
/// returns a diagnostic string for configuration problems (malformed send
/// time, unknown timezone, unreadable delivery timestamp).
pub fn evaluate_user(user: &User, now: DateTime<Utc>) -> std::result::Result<Decision, String> {
    let tz: Tz = user
        .timezone
        .parse()
        .map_err(|_| format!("invalid timezone {:?}", user.timezone))?;

    let (hour, minute) = parse_send_time(&user.daily_send_time)
        .ok_or_else(|| format!("invalid daily_send_time {:?}", user.daily_send_time))?;

    let local = now.with_timezone(&tz);
    let target_minutes = i64::from(hour) * 60 + i64::from(minute);
    let current_minutes = i64::from(local.hour()) * 60 + i64::from(local.minute());

    let window = if user.send_time_type == "around" {
        AROUND_WINDOW_MINUTES
    } else {
        ON_WINDOW_MINUTES
    };

    if (current_minutes - target_minutes).abs() > window {
        return Ok(Decision::OutOfWindow);
    }

    if let Some(sent_at) = user.last_prompt_sent_at.as_deref() {
        let sent = DateTime::parse_from_rfc3339(sent_at)
            .map_err(|_| format!("unreadable last_prompt_sent_at {:?}", sent_at))?;
        if sent.with_timezone(&tz).date_naive() == local.date_naive() {
            return Ok(Decision::AlreadySentToday);
        }
    }

    Ok(Decision::Send)
}

/// Parse a local send time of the form "HH:MM".
fn parse_send_time(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// The scheduling engine: one instance per process, shared between the
/// periodic driver and any on-demand trigger.
pub struct SchedulingEngine<S, E, G> {
    db: Database,
    sender: S,
    chain: PromptChain<E, G>,
    pass_guard: tokio::sync::Mutex<()>,
}

impl<S, E, G> SchedulingEngine<S, E, G>
where
    S: OutboundSms,
    E: EventSource,
    G: PromptGenerator,
{
    /// Create a new engine.
    pub fn new(db: Database, sender: S, chain: PromptChain<E, G>) -> Self {
        Self {
            db,
            sender,
            chain,
            pass_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one scheduling pass at the current instant.
    ///
    /// Passes are non-reentrant: a pass invoked while another is in flight
    /// fails fast with [`SchedulerError::PassInProgress`].
    pub async fn run_pass(&self) -> Result<PassSummary> {
        self.run_pass_at(Utc::now()).await
    }

    /// Run one scheduling pass as of `now`. Split out for tests and replays.
    pub async fn run_pass_at(&self, now: DateTime<Utc>) -> Result<PassSummary> {
        let _guard = self
            .pass_guard
            .try_lock()
            .map_err(|_| SchedulerError::PassInProgress)?;

        let users = user::list_verified_users(self.db.pool()).await?;
        debug!(users = users.len(), "Starting scheduling pass");

        let outcomes: Vec<UserOutcome> = stream::iter(users)
            .map(|u| self.process_user(u, now))
            .buffer_unordered(PASS_CONCURRENCY)
            .collect()
            .await;

        let mut summary = PassSummary::default();
        for outcome in outcomes {
            match outcome {
                UserOutcome::Sent => summary.sent += 1,
                UserOutcome::Idle => {}
                UserOutcome::Skipped(diag) => summary.skipped.push(diag),
                UserOutcome::Error(msg) => summary.errors.push(msg),
            }
        }

        info!(
            sent = summary.sent,
            errors = summary.errors.len(),
            skipped = summary.skipped.len(),
            "Scheduling pass complete"
        );
        Ok(summary)
    }

    /// Process a single user. All failure paths resolve to an outcome so
    /// the pass keeps going.
    async fn process_user(&self, user: User, now: DateTime<Utc>) -> UserOutcome {
        let decision = match evaluate_user(&user, now) {
            Ok(decision) => decision,
            Err(msg) => {
                warn!(user_id = %user.id, "Skipping user: {}", msg);
                return UserOutcome::Error(format!("user {}: {}", user.id, msg));
            }
        };

        match decision {
            Decision::OutOfWindow => UserOutcome::Idle,
            Decision::AlreadySentToday => {
                debug!(user_id = %user.id, "Already sent today");
                UserOutcome::Skipped(format!("user {}: already sent today", user.id))
            }
            Decision::Send => self.send_prompt(&user, now).await,
        }
    }

    async fn send_prompt(&self, user: &User, now: DateTime<Utc>) -> UserOutcome {
        let prompt = self.chain.generate(user).await;

        if let Err(e) = self.sender.send_text(&user.phone, &prompt.text).await {
            // Delivery state stays untouched so a later in-window tick retries.
            warn!(user_id = %user.id, "Send failed: {}", e);
            return UserOutcome::Error(format!("user {}: send failed: {}", user.id, e));
        }

        let sent_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        match user::mark_prompt_sent(
            self.db.pool(),
            &user.id,
            user.last_prompt_sent_at.as_deref(),
            &sent_at,
            &prompt.text,
            &prompt.title,
        )
        .await
        {
            Ok(true) => {
                info!(user_id = %user.id, title = %prompt.title, "Prompt sent");
                UserOutcome::Sent
            }
            Ok(false) => {
                // Another writer updated the delivery state under us; the
                // message went out but the state records the other send.
                warn!(user_id = %user.id, "Delivery state changed mid-send");
                UserOutcome::Skipped(format!("user {}: delivery state changed mid-send", user.id))
            }
            Err(e) => UserOutcome::Error(format!("user {}: {}", user.id, e)),
        }
    }
}
