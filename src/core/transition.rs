//! Record of the most recent state change.
//!
//! The machine keeps exactly one of these, enough to answer "where did we
//! come from" for simple back-transitions without growing a history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A completed transition.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     sequence: 1,
///     from: "IdleState".to_string(),
///     to: "AttackState".to_string(),
///     at: Utc::now(),
/// };
///
/// assert!(record.left("IdleState"));
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// 1-based count of transitions performed by the machine.
    pub sequence: u64,
    /// Name of the state that was exited.
    pub from: String,
    /// Name of the state that was entered.
    pub to: String,
    /// When the new state finished entering.
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    pub(crate) fn now(sequence: u64, from: &str, to: &str) -> Self {
        Self {
            sequence,
            from: from.to_string(),
            to: to.to_string(),
            at: Utc::now(),
        }
    }

    /// `true` if this transition left the state named `name`.
    pub fn left(&self, name: &str) -> bool {
        self.from == name
    }

    /// Time spent in the new state as of `now`.
    ///
    /// Returns `Duration::ZERO` if `now` precedes the record.
    pub fn time_in_state(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
