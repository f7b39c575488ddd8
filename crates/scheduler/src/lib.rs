//! Prompt scheduling, generation chain, and reply correlation for Jot.
//!
//! Three pieces share the per-user delivery state:
//!
//! - [`engine::SchedulingEngine`] runs one pass per external tick, deciding
//!   for every verified user whether their local send time falls in the
//!   current window and at most one prompt has gone out today.
//! - [`chain::PromptChain`] produces the prompt itself through a fallback
//!   chain: calendar-personalized generation first, a static pool last.
//! - [`correlator::ReplyCorrelator`] matches inbound messages back to the
//!   outstanding prompt and captures them as journal entries.
//!
//! The delivery-state transitions are conditional database updates, so an
//! inbound reply racing a scheduling pass (or a duplicate inbound delivery)
//! resolves to exactly one winner.

pub mod chain;
pub mod correlator;
pub mod engine;
pub mod error;
pub mod traits;

pub use chain::{GeneratedPrompt, PromptChain, DEFAULT_PROMPT};
pub use correlator::{InboundOutcome, ReplyCorrelator, SkipReason, REPLY_WINDOW_HOURS};
pub use engine::{evaluate_user, Decision, PassSummary, SchedulingEngine};
pub use error::{Result, SchedulerError};
pub use traits::{EventSource, NoOpSms, OutboundSms, PromptGenerator};
