//! Gamified progression core for an autonomous agent.
//!
//! Tracks XP, levels, talent-branch investment, a chosen specialization
//! and threshold-gated combo bonuses. All mutation goes through the
//! progression engine and award policy; storage and rendering live with
//! the callers.

pub mod analytics;
pub mod award;
pub mod classify;
pub mod combos;
pub mod engine;
pub mod error;
pub mod presets;
pub mod share;
pub mod state;
pub mod store;

pub use error::TalentError;
pub use state::{Branch, EventKind, HistoryEvent, TalentState};
