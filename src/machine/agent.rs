//! An owner bundled with the machine that drives it.

use crate::builder::StateMachineBuilder;
use crate::core::{Owner, State};
use crate::machine::driver::StateMachine;
use crate::machine::error::FsmResult;

/// Owner plus its exclusively owned state machine.
///
/// Dropping an agent drops the machine and its states without calling
/// `exit`; call [`terminate`](Agent::terminate) first when exit hooks must
/// run.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::{Control, Owner, State};
/// use agent_fsm::{Agent, StateMachineBuilder};
///
/// #[derive(Default)]
/// struct Guard {
///     alerted: bool,
/// }
///
/// impl Owner for Guard {
///     type Inner = ();
///     type Outer = ();
///     type Param = ();
///     type Reply = ();
/// }
///
/// struct Patrol;
/// impl State<Guard> for Patrol {}
///
/// struct Alert;
/// impl State<Guard> for Alert {
///     fn enter(&mut self, owner: &mut Guard, _control: &mut Control<Guard>, _param: Option<()>) {
///         owner.alerted = true;
///     }
/// }
///
/// let builder = StateMachineBuilder::new().initial(Patrol);
/// let mut guard = Agent::new(Guard::default(), builder).unwrap();
/// guard.change_state(Alert, None).unwrap();
///
/// assert!(guard.owner().alerted);
/// assert_eq!(guard.machine().previous_state_name(), Some("Patrol"));
/// ```
pub struct Agent<O: Owner> {
    owner: O,
    machine: StateMachine<O>,
}

impl<O: Owner> Agent<O> {
    /// Build the machine from `builder` and start it for `owner`.
    pub fn new(mut owner: O, builder: StateMachineBuilder<O>) -> FsmResult<Self> {
        let machine = builder.build(&mut owner)?;
        Ok(Self { owner, machine })
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Mutable access to the owner, e.g. to update fields states observe.
    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    pub fn machine(&self) -> &StateMachine<O> {
        &self.machine
    }

    pub fn handle_inner(&mut self, event: O::Inner) -> FsmResult<Option<O::Reply>> {
        self.machine.handle_inner(&mut self.owner, event)
    }

    pub fn handle_outer(&mut self, event: O::Outer) -> FsmResult<Option<O::Reply>> {
        self.machine.handle_outer(&mut self.owner, event)
    }

    pub fn change_state<S>(&mut self, state: S, param: Option<O::Param>) -> FsmResult<()>
    where
        S: State<O> + 'static,
    {
        self.machine.change_state(&mut self.owner, state, param)
    }

    pub fn set_global_state<S>(&mut self, state: S) -> FsmResult<()>
    where
        S: State<O> + 'static,
    {
        self.machine.set_global_state(&mut self.owner, state)
    }

    pub fn clear_global_state(&mut self) -> FsmResult<()> {
        self.machine.clear_global_state(&mut self.owner)
    }

    /// Run the exit hooks and retire the machine.
    pub fn terminate(&mut self) -> FsmResult<()> {
        self.machine.terminate(&mut self.owner)
    }

    pub fn into_parts(self) -> (O, StateMachine<O>) {
        (self.owner, self.machine)
    }
}
