//! The driver that owns the active state and performs transitions.

use crate::config::{FsmConfig, ReplyPreference};
use crate::core::{
    Channel, Control, Event, Owner, PendingTransition, Phase, State, TransitionRecord,
};
use crate::machine::error::{FsmError, FsmResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Unique identity of a machine, for correlating log lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// An event on its way to the handlers, tagged with its channel.
enum Dispatch<'e, O: Owner> {
    Inner(&'e O::Inner),
    Outer(&'e O::Outer),
}

impl<O: Owner> Dispatch<'_, O> {
    fn channel(&self) -> Channel {
        match self {
            Self::Inner(_) => Channel::Inner,
            Self::Outer(_) => Channel::Outer,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Inner(event) => event.name(),
            Self::Outer(event) => event.name(),
        }
    }

    fn deliver(
        &self,
        state: &mut dyn State<O>,
        owner: &mut O,
        control: &mut Control<O>,
    ) -> Option<O::Reply> {
        control.set_phase(Phase::Dispatching);
        let reply = match self {
            Self::Inner(event) => state.on_inner(owner, control, event),
            Self::Outer(event) => state.on_outer(owner, control, event),
        };
        control.set_phase(Phase::Idle);
        reply
    }
}

/// Finite state machine driving an owner of type `O`.
///
/// The machine holds exactly one active state and, optionally, a global
/// state that sees every message first. It does not own the owner: every
/// operation borrows it, and the owner is passed on to each hook. Use
/// [`Agent`](crate::Agent) to keep the two together.
///
/// Build one with [`StateMachineBuilder`](crate::StateMachineBuilder).
///
/// # Dispatch order
///
/// For each event the global handler runs, transitions it requested are
/// applied, then the handler of the (possibly new) active state runs and
/// its requests are applied. Both handlers always run.
///
/// # Reentrancy
///
/// Transitions requested from the active state's `enter` or `exit` follow
/// [`FsmConfig::reentrancy`]. Chains longer than
/// [`FsmConfig::max_chained_transitions`] are cut off with
/// [`FsmError::TransitionLimitExceeded`]. Whenever a call fails, requests
/// still waiting in the queue are dropped.
pub struct StateMachine<O: Owner> {
    id: MachineId,
    config: FsmConfig,
    active: Box<dyn State<O>>,
    global: Option<Box<dyn State<O>>>,
    control: Control<O>,
    last_transition: Option<TransitionRecord>,
    transitions: u64,
    terminated: bool,
}

impl<O: Owner> StateMachine<O> {
    /// Enter the global state (if any), then the initial state, then apply
    /// whatever they requested.
    ///
    /// If applying those requests fails, the active and global states are
    /// exited before the error is returned, so every state that was entered
    /// is also exited.
    pub(crate) fn start(
        owner: &mut O,
        config: FsmConfig,
        global: Option<Box<dyn State<O>>>,
        initial: Box<dyn State<O>>,
        param: Option<O::Param>,
    ) -> FsmResult<Self> {
        let mut machine = Self {
            id: MachineId::new(),
            control: Control::new(config.reentrancy),
            config,
            active: initial,
            global,
            last_transition: None,
            transitions: 0,
            terminated: false,
        };

        debug!(
            machine = %machine.config.label,
            id = %machine.id,
            initial = machine.active.name(),
            global = machine.global_state_name(),
            "starting state machine"
        );

        if let Some(global) = machine.global.as_mut() {
            machine.control.set_phase(Phase::Installing);
            global.enter(owner, &mut machine.control, None);
        }
        machine.control.set_phase(Phase::Entering);
        machine.active.enter(owner, &mut machine.control, param);
        machine.control.set_phase(Phase::Idle);

        let started = machine
            .check_rejected()
            .and_then(|()| machine.apply_pending(owner));
        if let Err(err) = started {
            warn!(
                machine = %machine.config.label,
                id = %machine.id,
                active = machine.active.name(),
                error = %err,
                "start failed, exiting entered states"
            );
            machine.exit_all(owner);
            return Err(err);
        }
        Ok(machine)
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// The active state.
    pub fn current_state(&self) -> &dyn State<O> {
        &*self.active
    }

    pub fn current_state_name(&self) -> &str {
        self.active.name()
    }

    /// Check the active state by name.
    pub fn is_in(&self, name: &str) -> bool {
        self.active.name() == name
    }

    pub fn global_state_name(&self) -> Option<&str> {
        self.global.as_ref().map(|g| g.name())
    }

    pub fn has_global_state(&self) -> bool {
        self.global.is_some()
    }

    /// Name of the state active before the last transition.
    pub fn previous_state_name(&self) -> Option<&str> {
        self.last_transition.as_ref().map(|t| t.from.as_str())
    }

    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.last_transition.as_ref()
    }

    /// Number of transitions performed since the machine started.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Exit the active state and enter `state` with `param`.
    ///
    /// On success the active state is `state`, or whatever it requested in
    /// turn under [`ReentrancyPolicy::Queue`](crate::ReentrancyPolicy::Queue).
    pub fn change_state<S>(
        &mut self,
        owner: &mut O,
        state: S,
        param: Option<O::Param>,
    ) -> FsmResult<()>
    where
        S: State<O> + 'static,
    {
        self.change_state_boxed(owner, Box::new(state), param)
    }

    /// Boxed form of [`change_state`](StateMachine::change_state).
    pub fn change_state_boxed(
        &mut self,
        owner: &mut O,
        state: Box<dyn State<O>>,
        param: Option<O::Param>,
    ) -> FsmResult<()> {
        self.ensure_running()?;
        self.control.change_state_boxed(state, param);
        self.apply_pending(owner)
    }

    /// Dispatch a self-originated event.
    ///
    /// Returns the reply picked by [`FsmConfig::reply_preference`]; `None`
    /// means no handler claimed the event.
    pub fn handle_inner(&mut self, owner: &mut O, event: O::Inner) -> FsmResult<Option<O::Reply>> {
        self.dispatch(owner, Dispatch::Inner(&event))
    }

    /// Dispatch a common event.
    pub fn handle_outer(&mut self, owner: &mut O, event: O::Outer) -> FsmResult<Option<O::Reply>> {
        self.dispatch(owner, Dispatch::Outer(&event))
    }

    /// Install `state` as the global state, exiting the previous one.
    pub fn set_global_state<S>(&mut self, owner: &mut O, state: S) -> FsmResult<()>
    where
        S: State<O> + 'static,
    {
        self.replace_global(owner, Some(Box::new(state)))
    }

    /// Exit and remove the global state, if there is one.
    pub fn clear_global_state(&mut self, owner: &mut O) -> FsmResult<()> {
        self.replace_global(owner, None)
    }

    /// Exit the active state, then the global state, and refuse any
    /// further use of the machine.
    ///
    /// Transitions requested while exiting are dropped.
    pub fn terminate(&mut self, owner: &mut O) -> FsmResult<()> {
        self.ensure_running()?;
        self.exit_all(owner);

        self.terminated = true;
        debug!(
            machine = %self.config.label,
            id = %self.id,
            last = self.active.name(),
            "state machine terminated"
        );
        Ok(())
    }

    /// Exit the active state, then the global state, dropping whatever they
    /// request on the way out.
    fn exit_all(&mut self, owner: &mut O) {
        self.control.set_phase(Phase::Exiting);
        self.active.exit(owner, &mut self.control);
        if let Some(global) = self.global.as_mut() {
            self.control.set_phase(Phase::Installing);
            global.exit(owner, &mut self.control);
        }
        self.control.set_phase(Phase::Idle);

        let dropped = self.control.discard();
        if dropped > 0 {
            warn!(
                machine = %self.config.label,
                id = %self.id,
                dropped,
                "dropping transitions requested while exiting"
            );
        }
    }

    fn dispatch(&mut self, owner: &mut O, message: Dispatch<'_, O>) -> FsmResult<Option<O::Reply>> {
        self.ensure_running()?;

        trace!(
            machine = %self.config.label,
            id = %self.id,
            channel = %message.channel(),
            event = message.name(),
            active = self.active.name(),
            "dispatching event"
        );

        let global_reply = match self.global.as_mut() {
            Some(global) => message.deliver(&mut **global, owner, &mut self.control),
            None => None,
        };
        let after_global = self.apply_pending(owner);

        let reply = message.deliver(&mut *self.active, owner, &mut self.control);
        let after_active = self.apply_pending(owner);

        after_global?;
        after_active?;

        Ok(match self.config.reply_preference {
            ReplyPreference::Active => reply,
            ReplyPreference::GlobalFirst => global_reply.or(reply),
        })
    }

    fn replace_global(&mut self, owner: &mut O, state: Option<Box<dyn State<O>>>) -> FsmResult<()> {
        self.ensure_running()?;

        if let Some(mut old) = self.global.take() {
            self.control.set_phase(Phase::Installing);
            old.exit(owner, &mut self.control);
            debug!(
                machine = %self.config.label,
                id = %self.id,
                global = old.name(),
                "global state removed"
            );
        }

        if let Some(state) = state {
            let global = self.global.insert(state);
            self.control.set_phase(Phase::Installing);
            global.enter(owner, &mut self.control, None);
            debug!(
                machine = %self.config.label,
                id = %self.id,
                global = global.name(),
                "global state installed"
            );
        }
        self.control.set_phase(Phase::Idle);

        self.check_rejected()?;
        self.apply_pending(owner)
    }

    /// Drain the request queue, one transition at a time.
    fn apply_pending(&mut self, owner: &mut O) -> FsmResult<()> {
        let limit = self.config.chain_limit();
        let mut applied = 0;

        while let Some(next) = self.control.next_pending() {
            if applied == limit {
                let dropped = self.control.discard() + 1;
                warn!(
                    machine = %self.config.label,
                    id = %self.id,
                    limit,
                    dropped,
                    active = self.active.name(),
                    "transition chain limit exceeded"
                );
                return Err(FsmError::TransitionLimitExceeded {
                    limit,
                    active: self.active.name().to_string(),
                });
            }

            self.transition(owner, next)?;
            applied += 1;
        }

        Ok(())
    }

    /// exit(old), swap, enter(new). The only place `active` is written.
    fn transition(&mut self, owner: &mut O, next: PendingTransition<O>) -> FsmResult<()> {
        let PendingTransition { state, param } = next;

        if self.config.reject_self_transitions && state.name() == self.active.name() {
            self.control.discard();
            return Err(FsmError::SelfTransition {
                state: state.name().to_string(),
            });
        }

        self.control.set_phase(Phase::Exiting);
        self.active.exit(owner, &mut self.control);

        let previous = std::mem::replace(&mut self.active, state);

        self.control.set_phase(Phase::Entering);
        self.active.enter(owner, &mut self.control, param);
        self.control.set_phase(Phase::Idle);

        self.transitions += 1;
        let record = TransitionRecord::now(self.transitions, previous.name(), self.active.name());
        debug!(
            machine = %self.config.label,
            id = %self.id,
            from = %record.from,
            to = %record.to,
            sequence = record.sequence,
            "state changed"
        );
        self.last_transition = Some(record);

        self.check_rejected()
    }

    fn check_rejected(&mut self) -> FsmResult<()> {
        let Some(first) = self.control.take_rejected().into_iter().next() else {
            return Ok(());
        };
        self.control.discard();

        Err(FsmError::ReentrantTransition {
            active: self.active.name().to_string(),
            requested: first.requested,
            phase: first.phase,
        })
    }

    fn ensure_running(&self) -> FsmResult<()> {
        if self.terminated {
            return Err(FsmError::Terminated {
                machine: self.config.label.clone(),
            });
        }
        Ok(())
    }
}

impl<O: Owner> fmt::Debug for StateMachine<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("label", &self.config.label)
            .field("active", &self.active.name())
            .field("global", &self.global_state_name())
            .field("transitions", &self.transitions)
            .field("terminated", &self.terminated)
            .finish()
    }
}
