//! The owner contract and the `State` trait.
//!
//! A state describes *when* the owner changes behaviour, never *how* the
//! behaviour is carried out: an attack state calls `owner.do_attack()` and
//! leaves the rest to the owner.

use super::control::Control;
use super::event::Event;

/// The entity controlled by a state machine.
///
/// The associated types fix the shape of everything that flows through the
/// machine, so handlers work with typed payloads instead of casting.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::{Message, Owner};
/// use agent_fsm::event_ids;
///
/// event_ids! {
///     pub enum SelfId { OnHurt }
/// }
///
/// event_ids! {
///     pub enum CommonId { OnTurn }
/// }
///
/// struct Enemy {
///     health: i32,
/// }
///
/// impl Owner for Enemy {
///     type Inner = Message<SelfId>;
///     type Outer = Message<CommonId>;
///     type Param = String;
///     type Reply = ();
/// }
/// ```
pub trait Owner: 'static {
    /// Self-originated events.
    type Inner: Event;
    /// Events shared across machines.
    type Outer: Event;
    /// Parameter handed to [`State::enter`] on activation.
    type Param;
    /// Value a handler returns when it handles an event.
    type Reply;
}

/// One mutually-exclusive mode of owner behaviour.
///
/// Every method has a default, so a state overrides only what it cares
/// about. A handler that is not overridden returns `None`, the "unhandled"
/// sentinel, and leaves the owner untouched.
///
/// Transitions are requested through the [`Control`] handle passed to every
/// hook; the driver applies them once the hook returns.
///
/// # Lifecycle
///
/// 1. Constructed by whoever requests the transition.
/// 2. [`enter`](State::enter) exactly once when it becomes active.
/// 3. Any number of handler calls while active.
/// 4. [`exit`](State::exit) exactly once when it stops being active.
/// 5. Dropped.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::{Control, Message, Owner, State};
/// use agent_fsm::event_ids;
///
/// event_ids! {
///     pub enum SelfId { OnAttackEnd }
/// }
///
/// struct Enemy {
///     idle_calls: u32,
/// }
///
/// impl Owner for Enemy {
///     type Inner = Message<SelfId>;
///     type Outer = ();
///     type Param = ();
///     type Reply = ();
/// }
///
/// struct IdleState;
///
/// impl State<Enemy> for IdleState {
///     fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
///         owner.idle_calls += 1;
///     }
/// }
///
/// struct AttackState;
///
/// impl State<Enemy> for AttackState {
///     fn on_inner(
///         &mut self,
///         _owner: &mut Enemy,
///         control: &mut Control<Enemy>,
///         event: &Message<SelfId>,
///     ) -> Option<()> {
///         if event.is(SelfId::OnAttackEnd) {
///             control.change_state(IdleState, None);
///             return Some(());
///         }
///         None
///     }
/// }
/// ```
pub trait State<O: Owner> {
    /// Name used in logs, errors and transition records.
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Called once when the state becomes active.
    fn enter(&mut self, _owner: &mut O, _control: &mut Control<O>, _param: Option<O::Param>) {}

    /// Called once when the state stops being active.
    fn exit(&mut self, _owner: &mut O, _control: &mut Control<O>) {}

    /// Handle a self-originated event.
    fn on_inner(
        &mut self,
        _owner: &mut O,
        _control: &mut Control<O>,
        _event: &O::Inner,
    ) -> Option<O::Reply> {
        None
    }

    /// Handle a common event.
    fn on_outer(
        &mut self,
        _owner: &mut O,
        _control: &mut Control<O>,
        _event: &O::Outer,
    ) -> Option<O::Reply> {
        None
    }
}

/// Strip the module path (and anything after a generic bracket) from a
/// `type_name` result.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
