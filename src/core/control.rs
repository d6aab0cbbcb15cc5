//! Transition requests raised from inside state hooks.

use super::state::{Owner, State};
use crate::config::ReentrancyPolicy;
use std::collections::VecDeque;
use std::fmt::{self, Display};
use tracing::{trace, warn};

/// What the driver is doing when a hook runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Not inside any hook.
    Idle,
    /// Inside a message handler.
    Dispatching,
    /// Inside `enter`.
    Entering,
    /// Inside `exit`.
    Exiting,
    /// Inside the global state's `enter` or `exit` while it is installed or
    /// removed. Not a transition of the active state.
    Installing,
}

impl Phase {
    /// `true` while a transition is in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Dispatching => f.write_str("dispatch"),
            Self::Entering => f.write_str("enter"),
            Self::Exiting => f.write_str("exit"),
            Self::Installing => f.write_str("install"),
        }
    }
}

pub(crate) struct PendingTransition<O: Owner> {
    pub(crate) state: Box<dyn State<O>>,
    pub(crate) param: Option<O::Param>,
}

/// A request refused under [`ReentrancyPolicy::Reject`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct RejectedRequest {
    pub(crate) requested: String,
    pub(crate) phase: Phase,
}

/// Capability handle passed to every hook.
///
/// States never touch the driver directly: they ask for a transition here
/// and the driver performs it as soon as the current hook returns. Requests
/// are applied in the order they were made.
pub struct Control<O: Owner> {
    pending: VecDeque<PendingTransition<O>>,
    rejected: Vec<RejectedRequest>,
    phase: Phase,
    policy: ReentrancyPolicy,
}

impl<O: Owner> Control<O> {
    pub(crate) fn new(policy: ReentrancyPolicy) -> Self {
        Self {
            pending: VecDeque::new(),
            rejected: Vec::new(),
            phase: Phase::Idle,
            policy,
        }
    }

    /// A handle that belongs to no machine.
    ///
    /// Useful for exercising a state's hooks in isolation and asserting on
    /// what it requested through [`pending_names`](Control::pending_names).
    pub fn detached() -> Self {
        Self::new(ReentrancyPolicy::Queue)
    }

    /// Request a transition to `state`, entered with `param`.
    pub fn change_state<S>(&mut self, state: S, param: Option<O::Param>)
    where
        S: State<O> + 'static,
    {
        self.request(Box::new(state), param);
    }

    /// Boxed form of [`change_state`](Control::change_state).
    pub fn change_state_boxed(&mut self, state: Box<dyn State<O>>, param: Option<O::Param>) {
        self.request(state, param);
    }

    fn request(&mut self, state: Box<dyn State<O>>, param: Option<O::Param>) {
        if self.phase.is_transitioning() && self.policy == ReentrancyPolicy::Reject {
            warn!(
                requested = state.name(),
                phase = %self.phase,
                "rejecting transition requested during a transition"
            );
            self.rejected.push(RejectedRequest {
                requested: state.name().to_string(),
                phase: self.phase,
            });
            return;
        }

        trace!(requested = state.name(), phase = %self.phase, "transition requested");
        self.pending.push_back(PendingTransition { state, param });
    }

    /// Phase of the hook currently holding this handle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Names of the states waiting to be entered, oldest first.
    pub fn pending_names(&self) -> Vec<&str> {
        self.pending.iter().map(|p| p.state.name()).collect()
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn next_pending(&mut self) -> Option<PendingTransition<O>> {
        self.pending.pop_front()
    }

    pub(crate) fn take_rejected(&mut self) -> Vec<RejectedRequest> {
        std::mem::take(&mut self.rejected)
    }

    /// Drop every outstanding request, returning how many were dropped.
    pub(crate) fn discard(&mut self) -> usize {
        let dropped = self.pending.len() + self.rejected.len();
        self.pending.clear();
        self.rejected.clear();
        dropped
    }
}
