//! Reversible editing with a hierarchical undo/redo history.
//!
//! - [`Edit`]: a reversible change (Command pattern)
//! - [`CompoundEdit`]: several edits undone and redone as one
//! - [`VariableEdit`] / [`ToggleEdit`]: ready-made edits over [`Variable`](crate::reactive::Variable)s
//! - [`UndoManager`]: the history interface, implemented by [`EditHistory`]
//!   and the [`ConcurrentUndoManager`] decorator
//! - [`compound_edit`] / [`without_undo`]: scoped helpers that restore the
//!   manager on every exit path
//!
//! # Recording
//!
//! Edits are recorded *after* they have been applied; the history never
//! calls `redo` on a freshly recorded edit. [`update_variable`] does both
//! steps for the common case of setting one value.
//!
//! While an entry is being undone or redone, recording is disabled on the
//! whole manager tree. Subscribers that write back into variables during
//! undo therefore do not produce new entries.
//!
//! # Observing the history
//!
//! `can_undo`, `can_redo`, `undo_text`, `redo_text` and
//! `has_unsaved_changes` are [`Signal`](crate::reactive::Signal)s, so menu
//! items and title bars can subscribe instead of polling.

mod compound;
mod concurrent;
mod config;
mod edit;
mod history;
mod manager;
mod scope;
mod variable_edit;

pub use compound::CompoundEdit;
pub use concurrent::ConcurrentUndoManager;
pub use config::{DEFAULT_MAX_UNDO, HistoryConfig, HistoryLabels};
pub use edit::{AsAny, Edit, EditError, EditResult};
pub use history::EditHistory;
pub use manager::{UndoError, UndoManager};
pub use scope::{ActivitySuspension, CompoundEditGuard, compound_edit, without_undo};
pub use variable_edit::{ToggleEdit, VariableEdit, update_variable};
