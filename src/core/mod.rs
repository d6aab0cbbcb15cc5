//! Core state machine types.
//!
//! This module contains the pieces states are written against:
//! - The `Owner` contract and the `State` trait
//! - Event channels and the `Message` envelope
//! - The `Control` handle states use to request transitions
//! - The record of the last transition

mod control;
mod event;
mod state;
mod transition;

pub use control::{Control, Phase};
pub(crate) use control::PendingTransition;
pub use event::{Channel, Event, EventId, Message};
pub use state::{Owner, State};
pub use transition::TransitionRecord;
