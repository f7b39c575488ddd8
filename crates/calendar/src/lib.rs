//! Google Calendar event source for Jot.
//!
//! Exchanges a stored refresh token for an access token and lists the
//! events on the user's primary calendar for their local day. All failures
//! surface as [`CalendarError`]; the prompt chain treats any of them as
//! "no calendar context available" and falls through to its next tier.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::CalendarClient;
pub use config::CalendarConfig;
pub use error::CalendarError;
pub use types::{CalendarEvent, EventTime};
