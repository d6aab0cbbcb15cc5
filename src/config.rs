//! Runtime configuration for a state machine.

use serde::{Deserialize, Serialize};

/// Default upper bound on transitions applied in one chain.
pub const DEFAULT_MAX_CHAINED_TRANSITIONS: usize = 32;

/// What happens when `enter` or `exit` requests another transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Run the request after the in-flight transition completes.
    #[default]
    Queue,
    /// Complete the in-flight transition, drop the request and report
    /// [`FsmError::ReentrantTransition`](crate::FsmError::ReentrantTransition).
    Reject,
}

/// Which handler's reply a dispatch returns.
///
/// Both handlers always run; this only picks the return value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPreference {
    /// The active state's reply.
    #[default]
    Active,
    /// The global state's reply when it handled the event, otherwise the
    /// active state's.
    GlobalFirst,
}

/// Machine configuration.
///
/// Deserializes from any serde format; missing fields take their defaults.
///
/// # Example
///
/// ```rust
/// use agent_fsm::{FsmConfig, ReentrancyPolicy};
///
/// let config = FsmConfig {
///     label: "enemy-7".to_string(),
///     reentrancy: ReentrancyPolicy::Reject,
///     ..FsmConfig::default()
/// };
///
/// assert_eq!(config.max_chained_transitions, 32);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Human-readable machine name for logs and errors.
    pub label: String,
    pub reentrancy: ReentrancyPolicy,
    pub reply_preference: ReplyPreference,
    /// Transitions applied back to back before the chain is cut off.
    pub max_chained_transitions: usize,
    /// Fail when the target state has the active state's name.
    pub reject_self_transitions: bool,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            label: "fsm".to_string(),
            reentrancy: ReentrancyPolicy::default(),
            reply_preference: ReplyPreference::default(),
            max_chained_transitions: DEFAULT_MAX_CHAINED_TRANSITIONS,
            reject_self_transitions: false,
        }
    }
}

impl FsmConfig {
    /// Effective chain limit; never below one.
    pub fn chain_limit(&self) -> usize {
        self.max_chained_transitions.max(1)
    }
}
