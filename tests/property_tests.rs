//! Property-based tests for transitions and dispatch ordering.
//!
//! These tests use proptest to drive machines through random operation
//! sequences and check the lifecycle guarantees after every step.

use agent_fsm::core::{Control, Message, Owner, State};
use agent_fsm::{event_ids, Event, FsmError, StateMachine, StateMachineBuilder};
use proptest::prelude::*;

event_ids! {
    enum Sig {
        Ping,
        Pong,
    }
}

#[derive(Default)]
struct Recorder {
    log: Vec<String>,
    handled: u32,
}

impl Owner for Recorder {
    type Inner = Message<Sig>;
    type Outer = Message<Sig>;
    type Param = u8;
    type Reply = u32;
}

const NAMES: [&str; 4] = ["Alpha", "Beta", "Gamma", "Delta"];

/// Logs lifecycle hooks, leaves both handlers at their defaults.
struct Plain(&'static str);

impl State<Recorder> for Plain {
    fn name(&self) -> &str {
        self.0
    }

    fn enter(&mut self, owner: &mut Recorder, _control: &mut Control<Recorder>, param: Option<u8>) {
        owner.log.push(format!("{}.enter({param:?})", self.0));
    }

    fn exit(&mut self, owner: &mut Recorder, _control: &mut Control<Recorder>) {
        owner.log.push(format!("{}.exit", self.0));
    }
}

/// Handles both channels and counts on the owner.
struct Listener(&'static str);

impl State<Recorder> for Listener {
    fn name(&self) -> &str {
        self.0
    }

    fn on_inner(
        &mut self,
        owner: &mut Recorder,
        _control: &mut Control<Recorder>,
        event: &Message<Sig>,
    ) -> Option<u32> {
        owner.log.push(format!("{}.inner({})", self.0, event.name()));
        owner.handled += 1;
        Some(owner.handled)
    }

    fn on_outer(
        &mut self,
        owner: &mut Recorder,
        _control: &mut Control<Recorder>,
        event: &Message<Sig>,
    ) -> Option<u32> {
        owner.log.push(format!("{}.outer({})", self.0, event.name()));
        owner.handled += 1;
        Some(owner.handled)
    }
}

/// Requests itself on every enter.
struct Spinner;

impl State<Recorder> for Spinner {
    fn enter(
        &mut self,
        _owner: &mut Recorder,
        control: &mut Control<Recorder>,
        _param: Option<u8>,
    ) {
        control.change_state(Spinner, None);
    }
}

#[derive(Clone, Debug)]
enum Op {
    Change { target: usize, param: Option<u8> },
    Inner(Sig),
    Outer(Sig),
}

prop_compose! {
    fn arbitrary_sig()(pong in any::<bool>()) -> Sig {
        if pong { Sig::Pong } else { Sig::Ping }
    }
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len(), proptest::option::of(any::<u8>()))
            .prop_map(|(target, param)| Op::Change { target, param }),
        arbitrary_sig().prop_map(Op::Inner),
        arbitrary_sig().prop_map(Op::Outer),
    ]
}

fn plain_machine(owner: &mut Recorder) -> StateMachine<Recorder> {
    let machine = StateMachineBuilder::new()
        .initial(Plain(NAMES[0]))
        .build(owner)
        .unwrap();
    owner.log.clear();
    machine
}

proptest! {
    #[test]
    fn change_state_exits_once_then_enters_once(
        ops in prop::collection::vec(arbitrary_op(), 1..30)
    ) {
        let mut owner = Recorder::default();
        let mut machine = plain_machine(&mut owner);
        let mut expected_count = 0u64;

        for op in ops {
            let before = owner.log.len();
            let current = machine.current_state_name().to_string();

            if let Op::Change { target, param } = op {
                let next = NAMES[target];
                machine.change_state(&mut owner, Plain(next), param).unwrap();
                expected_count += 1;

                prop_assert_eq!(
                    &owner.log[before..],
                    &[format!("{current}.exit"), format!("{next}.enter({param:?})")][..]
                );
                prop_assert_eq!(machine.current_state_name(), next);
                prop_assert_eq!(machine.previous_state_name(), Some(current.as_str()));
            }
            prop_assert_eq!(machine.transition_count(), expected_count);
        }
    }

    #[test]
    fn global_handler_runs_once_before_active(
        ops in prop::collection::vec(arbitrary_op(), 1..30)
    ) {
        let mut owner = Recorder::default();
        let mut machine = StateMachineBuilder::new()
            .initial(Listener(NAMES[0]))
            .global(Listener("Global"))
            .build(&mut owner)
            .unwrap();

        for op in ops {
            let before = owner.log.len();
            let (channel, result) = match op {
                Op::Change { target, .. } => {
                    machine.change_state(&mut owner, Listener(NAMES[target]), None).unwrap();
                    continue;
                }
                Op::Inner(sig) => ("inner", machine.handle_inner(&mut owner, Message::new(sig))),
                Op::Outer(sig) => ("outer", machine.handle_outer(&mut owner, Message::new(sig))),
            };
            let reply = result.unwrap();

            let delta = &owner.log[before..];
            prop_assert_eq!(delta.len(), 2);
            let global_prefix = format!("Global.{channel}(");
            prop_assert!(delta[0].starts_with(&global_prefix));
            let active = machine.current_state_name();
            let active_prefix = format!("{active}.{channel}(");
            prop_assert!(delta[1].starts_with(&active_prefix));
            prop_assert_eq!(reply, Some(owner.handled));
        }
    }

    #[test]
    fn default_handlers_never_touch_the_owner(
        sigs in prop::collection::vec((arbitrary_sig(), any::<bool>()), 1..30)
    ) {
        let mut owner = Recorder::default();
        let mut machine = plain_machine(&mut owner);

        for (sig, inner) in sigs {
            let reply = if inner {
                machine.handle_inner(&mut owner, Message::new(sig)).unwrap()
            } else {
                machine.handle_outer(&mut owner, Message::new(sig)).unwrap()
            };

            prop_assert!(reply.is_none());
            prop_assert!(owner.log.is_empty());
            prop_assert_eq!(owner.handled, 0);
            prop_assert_eq!(machine.transition_count(), 0);
        }
    }

    #[test]
    fn chains_stop_at_the_limit(limit in 1usize..12) {
        let mut owner = Recorder::default();
        let mut machine = StateMachineBuilder::new()
            .initial(Plain(NAMES[0]))
            .max_chained_transitions(limit)
            .build(&mut owner)
            .unwrap();

        let err = machine.change_state(&mut owner, Spinner, None).unwrap_err();

        prop_assert_eq!(
            err,
            FsmError::TransitionLimitExceeded { limit, active: "Spinner".to_string() }
        );
        prop_assert_eq!(machine.transition_count(), limit as u64);
    }

    #[test]
    fn terminated_machine_rejects_every_op(op in arbitrary_op()) {
        let mut owner = Recorder::default();
        let mut machine = plain_machine(&mut owner);
        machine.terminate(&mut owner).unwrap();
        owner.log.clear();

        let result = match op {
            Op::Change { target, param } => machine
                .change_state(&mut owner, Plain(NAMES[target]), param)
                .map(|_| None),
            Op::Inner(sig) => machine.handle_inner(&mut owner, Message::new(sig)),
            Op::Outer(sig) => machine.handle_outer(&mut owner, Message::new(sig)),
        };

        let is_terminated = matches!(result, Err(FsmError::Terminated { .. }));
        prop_assert!(is_terminated);
        prop_assert!(owner.log.is_empty());
        prop_assert_eq!(machine.current_state_name(), NAMES[0]);
    }
}
