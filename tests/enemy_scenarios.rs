//! End-to-end scenarios for an enemy agent with idle, attack and dead
//! states plus a global state watching its health.

use agent_fsm::core::{Control, Message, Owner, State};
use agent_fsm::{event_ids, Agent, FsmError, StateMachineBuilder};

event_ids! {
    pub enum SelfEventId {
        OnHurt,
        OnAttackEnd,
    }
}

event_ids! {
    pub enum CommonEventId {
        OnTurn,
    }
}

/// Self events carry the damage taken, when there is any.
type SelfEvent = Message<SelfEventId, i32>;
type CommonEvent = Message<CommonEventId>;

#[derive(Default)]
struct Enemy {
    health: i32,
    trail: Vec<String>,
    attack_param: Option<String>,
}

impl Enemy {
    fn with_health(health: i32) -> Self {
        Self {
            health,
            ..Self::default()
        }
    }

    fn do_idle(&mut self) {
        self.trail.push("doIdle".to_string());
    }

    fn do_attack(&mut self, param: Option<&str>) {
        self.attack_param = param.map(str::to_string);
        self.trail.push("doAttack".to_string());
    }

    fn do_die(&mut self) {
        self.trail.push("doDie".to_string());
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
        if event.is(SelfEventId::OnHurt) {
            owner.health -= event.data().copied().unwrap_or(0);
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
        owner.trail.push("IdleState.enter".to_string());
        owner.do_idle();
    }

    fn exit(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>) {
        owner.trail.push("IdleState.exit".to_string());
    }

    fn on_outer(
        &mut self,
        _owner: &mut Enemy,
        control: &mut Control<Enemy>,
        event: &CommonEvent,
    ) -> Option<()> {
        if event.is(CommonEventId::OnTurn) {
            control.change_state(AttackState::new("someparameter"), None);
            return Some(());
        }
        None
    }
}

struct AttackState {
    param: Option<String>,
}

impl AttackState {
    fn new(param: &str) -> Self {
        Self {
            param: Some(param.to_string()),
        }
    }
}

impl State<Enemy> for AttackState {
    fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
        owner.trail.push("AttackState.enter".to_string());
        owner.do_attack(self.param.as_deref());
    }

    fn exit(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>) {
        owner.trail.push("AttackState.exit".to_string());
    }

    fn on_inner(
        &mut self,
        _owner: &mut Enemy,
        control: &mut Control<Enemy>,
        event: &SelfEvent,
    ) -> Option<()> {
        if event.is(SelfEventId::OnAttackEnd) {
            control.change_state(IdleState, None);
            return Some(());
        }
        None
    }
}

struct DeadState;

impl State<Enemy> for DeadState {
    fn enter(&mut self, owner: &mut Enemy, _control: &mut Control<Enemy>, _param: Option<()>) {
        owner.trail.push("DeadState.enter".to_string());
        owner.do_die();
    }
}

fn spawn<S: State<Enemy> + 'static>(initial: S, health: i32) -> Agent<Enemy> {
    let builder = StateMachineBuilder::new()
        .label("enemy")
        .initial(initial)
        .global(GlobalState);
    let mut agent = Agent::new(Enemy::with_health(health), builder).unwrap();
    agent.owner_mut().trail.clear();
    agent
}

#[test]
fn turn_in_idle_starts_attack_with_parameter() {
    let mut enemy = spawn(IdleState, 10);

    let reply = enemy.handle_outer(Message::new(CommonEventId::OnTurn)).unwrap();

    assert_eq!(reply, Some(()));
    assert_eq!(
        enemy.owner().trail,
        vec!["IdleState.exit", "AttackState.enter", "doAttack"]
    );
    assert_eq!(enemy.owner().attack_param.as_deref(), Some("someparameter"));
    assert_eq!(enemy.machine().current_state_name(), "AttackState");
}

#[test]
fn attack_end_returns_to_idle() {
    let mut enemy = spawn(AttackState::new("first"), 10);

    enemy.handle_inner(Message::new(SelfEventId::OnAttackEnd)).unwrap();

    assert_eq!(
        enemy.owner().trail,
        vec!["AttackState.exit", "IdleState.enter", "doIdle"]
    );
    assert_eq!(enemy.machine().current_state_name(), "IdleState");
    assert_eq!(enemy.machine().previous_state_name(), Some("AttackState"));
}

#[test]
fn zero_health_hurt_kills_from_idle() {
    let mut enemy = spawn(IdleState, 10);
    enemy.owner_mut().health = 0;

    enemy.handle_inner(Message::new(SelfEventId::OnHurt)).unwrap();

    assert_eq!(
        enemy.owner().trail,
        vec!["IdleState.exit", "DeadState.enter", "doDie"]
    );
    assert_eq!(enemy.machine().current_state_name(), "DeadState");
}

#[test]
fn zero_health_hurt_kills_from_attack() {
    let mut enemy = spawn(AttackState::new("first"), 10);
    enemy.owner_mut().health = 0;

    enemy.handle_inner(Message::new(SelfEventId::OnHurt)).unwrap();

    assert_eq!(
        enemy.owner().trail,
        vec!["AttackState.exit", "DeadState.enter", "doDie"]
    );
    assert_eq!(enemy.machine().current_state_name(), "DeadState");
}

#[test]
fn lethal_damage_kills() {
    let mut enemy = spawn(IdleState, 5);

    enemy
        .handle_inner(Message::with_data(SelfEventId::OnHurt, 3))
        .unwrap();
    assert_eq!(enemy.owner().health, 2);
    assert_eq!(enemy.machine().current_state_name(), "IdleState");

    enemy
        .handle_inner(Message::with_data(SelfEventId::OnHurt, 3))
        .unwrap();
    assert_eq!(enemy.owner().health, -1);
    assert_eq!(enemy.machine().current_state_name(), "DeadState");
}

#[test]
fn attack_end_while_idle_is_absorbed() {
    let mut enemy = spawn(IdleState, 10);

    let reply = enemy
        .handle_inner(Message::new(SelfEventId::OnAttackEnd))
        .unwrap();

    assert!(reply.is_none());
    assert!(enemy.owner().trail.is_empty());
    assert_eq!(enemy.machine().transition_count(), 0);
}

#[test]
fn dead_enemy_ignores_turns() {
    let mut enemy = spawn(DeadState, 0);

    let reply = enemy.handle_outer(Message::new(CommonEventId::OnTurn)).unwrap();

    assert!(reply.is_none());
    assert_eq!(enemy.machine().current_state_name(), "DeadState");
}

#[test]
fn full_round_idle_attack_idle_dead() {
    let mut enemy = spawn(IdleState, 1);

    enemy.handle_outer(Message::new(CommonEventId::OnTurn)).unwrap();
    enemy.handle_inner(Message::new(SelfEventId::OnAttackEnd)).unwrap();
    enemy
        .handle_inner(Message::with_data(SelfEventId::OnHurt, 1))
        .unwrap();

    assert_eq!(
        enemy.owner().trail,
        vec![
            "IdleState.exit",
            "AttackState.enter",
            "doAttack",
            "AttackState.exit",
            "IdleState.enter",
            "doIdle",
            "IdleState.exit",
            "DeadState.enter",
            "doDie",
        ]
    );
    assert_eq!(enemy.machine().transition_count(), 3);
}

#[test]
fn terminated_enemy_fails_fast() {
    let mut enemy = spawn(IdleState, 10);
    enemy.terminate().unwrap();

    let err = enemy
        .handle_outer(Message::new(CommonEventId::OnTurn))
        .unwrap_err();

    assert_eq!(
        err,
        FsmError::Terminated {
            machine: "enemy".to_string()
        }
    );
    assert_eq!(enemy.owner().trail, vec!["IdleState.exit"]);
}
