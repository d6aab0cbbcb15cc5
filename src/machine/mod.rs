//! The state machine driver and the owner wrapper around it.
//!
//! # Key Concepts
//!
//! - **StateMachine**: holds the active and global states and is the only
//!   code that performs transitions
//! - **Agent**: an owner that owns its machine
//! - **FsmError**: every way the API can be misused

mod agent;
mod driver;
mod error;

pub use agent::Agent;
pub use driver::{MachineId, StateMachine};
pub use error::{FsmError, FsmResult};
