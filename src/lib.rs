//! Agent FSM: an owner-driven finite state machine
//!
//! A state machine gives an *owner* (a game agent, a connection, a device)
//! exactly one active behavioural state at a time. States react to events,
//! run side effects when they are entered and exited, and request
//! transitions; the owner implements the actual behaviours.
//!
//! # Core Concepts
//!
//! - **Owner**: the controlled entity, fixing the event, parameter and reply
//!   types via the `Owner` trait
//! - **State**: lifecycle hooks and handlers for the inner (self) and outer
//!   (common) event channels, all defaulting to no-ops
//! - **Global state**: a state consulted before the active one for every
//!   event, for rules that apply everywhere
//! - **Control**: the handle through which hooks request transitions
//!
//! # Example
//!
//! ```rust
//! use agent_fsm::core::{Control, Message, Owner, State};
//! use agent_fsm::{event_ids, Agent, StateMachineBuilder};
//!
//! event_ids! {
//!     pub enum SelfId { OnHurt }
//! }
//!
//! #[derive(Default)]
//! struct Enemy {
//!     health: i32,
//!     died: bool,
//! }
//!
//! impl Owner for Enemy {
//!     type Inner = Message<SelfId>;
//!     type Outer = ();
//!     type Param = ();
//!     type Reply = ();
//! }
//!
//! struct Idle;
//! impl State<Enemy> for Idle {}
//!
//! struct Dead;
//! impl State<Enemy> for Dead {
//!     fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
//!         owner.died = true;
//!     }
//! }
//!
//! struct Global;
//! impl State<Enemy> for Global {
//!     fn on_inner(
//!         &mut self,
//!         owner: &mut Enemy,
//!         control: &mut Control<Enemy>,
//!         event: &Message<SelfId>,
//!     ) -> Option<()> {
//!         if event.is(SelfId::OnHurt) && owner.health <= 0 {
//!             control.change_state(Dead, None);
//!         }
//!         None
//!     }
//! }
//!
//! let builder = StateMachineBuilder::new().initial(Idle).global(Global);
//! let mut enemy = Agent::new(Enemy::default(), builder).unwrap();
//!
//! enemy.handle_inner(Message::new(SelfId::OnHurt)).unwrap();
//! assert!(enemy.owner().died);
//! assert_eq!(enemy.machine().current_state_name(), "Dead");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use config::{FsmConfig, ReentrancyPolicy, ReplyPreference};
pub use crate::core::{
    Channel, Control, Event, EventId, Message, Owner, Phase, State, TransitionRecord,
};
pub use machine::{Agent, FsmError, FsmResult, MachineId, StateMachine};
