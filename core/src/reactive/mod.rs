//! Reactive value primitives.
//!
//! The undo core publishes its state (can undo, undo text, dirty flag, ...)
//! through these types, and typed edits such as
//! [`VariableEdit`](crate::undo::VariableEdit) operate on them.

mod variable;

pub use variable::{Signal, Subscription, Variable};
