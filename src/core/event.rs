//! Event channels delivered to states.
//!
//! Every owner declares two independent event types: an *inner* channel for
//! signals the owner raises about itself (hurt, attack finished) and an
//! *outer* channel for events shared by many machines (turn started, alarm
//! raised). Both implement [`Event`] so the driver can name them in logs.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// An event that can be dispatched through a state machine.
///
/// Events are plain values: they are handed to the driver, lent to the
/// handlers for the duration of one dispatch, then dropped.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::Event;
///
/// #[derive(Debug)]
/// enum SelfEvent {
///     Hurt { damage: u32 },
///     AttackEnd,
/// }
///
/// impl Event for SelfEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Hurt { .. } => "Hurt",
///             Self::AttackEnd => "AttackEnd",
///         }
///     }
/// }
///
/// assert_eq!(SelfEvent::Hurt { damage: 3 }.name(), "Hurt");
/// ```
pub trait Event: Debug {
    /// Identifying tag of the event, used for logging.
    fn name(&self) -> &str;
}

/// Closed set of event tags.
///
/// Usually declared with [`event_ids!`](crate::event_ids).
pub trait EventId: Copy + PartialEq + Debug {
    fn name(&self) -> &str;
}

/// Which channel an event travels on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Channel {
    /// Owner-internal signals.
    Inner,
    /// Events shared across machines.
    Outer,
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => f.write_str("inner"),
            Self::Outer => f.write_str("outer"),
        }
    }
}

/// Tag plus optional payload.
///
/// The payload type is fixed per channel, so handlers read it without any
/// runtime cast. Use a sum type instead when different tags carry different
/// payloads.
///
/// # Example
///
/// ```rust
/// use agent_fsm::core::{Event, Message};
/// use agent_fsm::event_ids;
///
/// event_ids! {
///     pub enum CommonId {
///         OnTurn,
///         OnAlarm,
///     }
/// }
///
/// let plain: Message<CommonId, u32> = Message::new(CommonId::OnTurn);
/// assert_eq!(plain.name(), "OnTurn");
/// assert!(plain.data().is_none());
///
/// let turn = Message::with_data(CommonId::OnTurn, 7u32);
/// assert_eq!(turn.data(), Some(&7));
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Message<Id, D = ()> {
    /// Identifying tag.
    pub id: Id,
    /// Payload interpreted by the handler according to `id`.
    pub data: Option<D>,
}

impl<Id: EventId, D> Message<Id, D> {
    /// Message without payload.
    pub fn new(id: Id) -> Self {
        Self { id, data: None }
    }

    /// Message carrying `data`.
    pub fn with_data(id: Id, data: D) -> Self {
        Self {
            id,
            data: Some(data),
        }
    }

    /// Check the tag.
    pub fn is(&self, id: Id) -> bool {
        self.id == id
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }
}

impl<Id: EventId, D: Debug> Event for Message<Id, D> {
    fn name(&self) -> &str {
        self.id.name()
    }
}

/// Owners that never use a channel can declare it as `()`.
impl Event for () {
    fn name(&self) -> &str {
        "()"
    }
}
