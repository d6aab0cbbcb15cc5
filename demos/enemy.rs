//! Enemy Agent
//!
//! This example drives an enemy through idle, attack and dead states.
//!
//! Key concepts:
//! - States call owner behaviours (`do_idle`, `do_attack`, `do_die`) and
//!   leave the how-to to the owner
//! - Self events as a sum type, common events as a tagged `Message`
//! - A global state that sends the enemy to `DeadState` from anywhere
//! - Structured logs of every transition
//!
//! Run with: RUST_LOG=debug cargo run --example enemy

use agent_fsm::core::{Control, Event, Message, Owner, State};
use agent_fsm::{event_ids, Agent, FsmError, StateMachineBuilder};
use tracing_subscriber::EnvFilter;

/// Signals the enemy raises about itself.
#[derive(Debug)]
enum SelfEvent {
    Hurt { damage: i32 },
    AttackEnd,
}

impl Event for SelfEvent {
    fn name(&self) -> &str {
        match self {
            Self::Hurt { .. } => "onHurt",
            Self::AttackEnd => "onAttackEnd",
        }
    }
}

event_ids! {
    enum CommonId {
        OnTurn,
    }
}

/// Shared events; the payload is the turn number.
type CommonEvent = Message<CommonId, u32>;

struct Enemy {
    name: String,
    health: i32,
}

impl Enemy {
    fn do_idle(&self) {
        println!("  {} stands around", self.name);
    }

    fn do_attack(&self, target: &str) {
        println!("  {} attacks {}", self.name, target);
    }

    fn do_die(&self) {
        println!("  {} collapses", self.name);
    }
}

impl Owner for Enemy {
    type Inner = SelfEvent;
    type Outer = CommonEvent;
    type Param = ();
    type Reply = ();
}

struct GlobalState;

impl State<Enemy> for GlobalState {
    fn on_inner(
        &mut self,
        owner: &mut Enemy,
        control: &mut Control<Enemy>,
        event: &SelfEvent,
    ) -> Option<()> {
        if let SelfEvent::Hurt { damage } = event {
            owner.health -= damage;
            println!("  {} takes {} damage ({} left)", owner.name, damage, owner.health);
            if owner.health <= 0 {
                control.change_state(DeadState, None);
            }
        }
        None
    }
}

struct IdleState;

impl State<Enemy> for IdleState {
    fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
        owner.do_idle();
    }

    fn on_outer(
        &mut self,
        _owner: &mut Enemy,
        control: &mut Control<Enemy>,
        event: &CommonEvent,
    ) -> Option<()> {
        if event.is(CommonId::OnTurn) {
            control.change_state(AttackState::new("the player"), None);
            return Some(());
        }
        None
    }
}

struct AttackState {
    target: String,
}

impl AttackState {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl State<Enemy> for AttackState {
    fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
        owner.do_attack(&self.target);
    }

    fn on_inner(
        &mut self,
        _owner: &mut Enemy,
        control: &mut Control<Enemy>,
        event: &SelfEvent,
    ) -> Option<()> {
        if let SelfEvent::AttackEnd = event {
            control.change_state(IdleState, None);
            return Some(());
        }
        None
    }
}

struct DeadState;

impl State<Enemy> for DeadState {
    fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
        owner.do_die();
    }
}

fn main() -> Result<(), FsmError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    println!("=== Enemy Agent Example ===\n");

    let enemy = Enemy {
        name: "goblin".to_string(),
        health: 5,
    };
    let builder = StateMachineBuilder::new()
        .label("goblin")
        .initial(IdleState)
        .global(GlobalState);
    let mut goblin = Agent::new(enemy, builder)?;

    for turn in 1..=3 {
        println!("Turn {turn}:");
        goblin.handle_outer(Message::with_data(CommonId::OnTurn, turn))?;
        goblin.handle_inner(SelfEvent::Hurt { damage: 2 })?;
        goblin.handle_inner(SelfEvent::AttackEnd)?;
        println!("  -> now in {}\n", goblin.machine().current_state_name());
    }

    if let Some(last) = goblin.machine().last_transition() {
        println!(
            "Last transition #{}: {} -> {}",
            last.sequence, last.from, last.to
        );
    }

    goblin.terminate()?;

    println!("\n=== Example Complete ===");
    Ok(())
}
