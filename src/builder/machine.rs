//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::{FsmConfig, ReentrancyPolicy, ReplyPreference};
use crate::core::{Owner, State};
use crate::machine::{FsmResult, StateMachine};

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::{Owner, State};
/// use agent_fsm::StateMachineBuilder;
///
/// struct Door;
///
/// impl Owner for Door {
///     type Inner = ();
///     type Outer = ();
///     type Param = ();
///     type Reply = ();
/// }
///
/// struct Closed;
/// impl State<Door> for Closed {}
///
/// let mut door = Door;
/// let machine = StateMachineBuilder::new()
///     .label("front-door")
///     .initial(Closed)
///     .build(&mut door)
///     .unwrap();
///
/// assert_eq!(machine.current_state_name(), "Closed");
/// ```
pub struct StateMachineBuilder<O: Owner> {
    initial: Option<Box<dyn State<O>>>,
    initial_param: Option<O::Param>,
    global: Option<Box<dyn State<O>>>,
    config: FsmConfig,
}

impl<O: Owner> StateMachineBuilder<O> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            initial_param: None,
            global: None,
            config: FsmConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial<S>(mut self, state: S) -> Self
    where
        S: State<O> + 'static,
    {
        self.initial = Some(Box::new(state));
        self
    }

    /// Set an already boxed initial state.
    pub fn initial_boxed(mut self, state: Box<dyn State<O>>) -> Self {
        self.initial = Some(state);
        self
    }

    /// Parameter handed to the initial state's `enter`.
    pub fn initial_param(mut self, param: O::Param) -> Self {
        self.initial_param = Some(param);
        self
    }

    /// Set the global state (optional).
    pub fn global<S>(mut self, state: S) -> Self
    where
        S: State<O> + 'static,
    {
        self.global = Some(Box::new(state));
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: FsmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    pub fn reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.config.reentrancy = policy;
        self
    }

    pub fn reply_preference(mut self, preference: ReplyPreference) -> Self {
        self.config.reply_preference = preference;
        self
    }

    pub fn max_chained_transitions(mut self, limit: usize) -> Self {
        self.config.max_chained_transitions = limit;
        self
    }

    pub fn reject_self_transitions(mut self, reject: bool) -> Self {
        self.config.reject_self_transitions = reject;
        self
    }

    /// Build the machine and start it for `owner`.
    ///
    /// The global state is entered first, then the initial state with the
    /// initial parameter. Transitions they request are applied before this
    /// returns.
    pub fn build(self, owner: &mut O) -> FsmResult<StateMachine<O>> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        StateMachine::start(owner, self.config, self.global, initial, self.initial_param)
    }
}

impl<O: Owner> Default for StateMachineBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}
