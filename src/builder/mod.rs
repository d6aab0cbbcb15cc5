//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder for machines and a macro for
//! declaring event tags with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
