//! The undo manager interface shared by [`EditHistory`] and its decorators.

use thiserror::Error;

use crate::reactive::Signal;

use super::edit::{Edit, EditError};
use super::history::EditHistory;

/// Misuse of an [`UndoManager`], or an edit that failed while being undone or
/// redone.
///
/// These indicate bugs in the calling code rather than user-facing
/// conditions: UI controls are expected to be disabled through
/// [`UndoManager::can_undo`] and [`UndoManager::can_redo`] before they could
/// trigger them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error("cannot undo: the undo stack is empty")]
    NothingToUndo,
    #[error("cannot redo: the redo stack is empty")]
    NothingToRedo,
    /// Undo or redo was requested while a compound edit is being recorded.
    #[error("undo and redo are not possible while a compound edit is in progress")]
    CompoundInProgress,
    /// An edit reporting `can_undo() == false` was recorded.
    #[error("attempt to record non-undoable edit '{0}'")]
    NotUndoable(String),
    /// Neither begin nor finish supplied a description for a compound edit.
    #[error("no description for compound edit provided")]
    MissingCompoundDescription,
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// A linear undo/redo history with observable state.
///
/// All methods take `&self`: managers are shared handles, and an edit being
/// undone may call back into the manager that owns it (those calls are not
/// recorded, see [`is_active`](Self::is_active)).
pub trait UndoManager: Send + Sync {
    /// Records `edit`, which has already been applied by the caller.
    ///
    /// Does nothing while the manager is inactive. While a compound edit is
    /// open on this manager or an ancestor the edit is buffered there instead.
    fn record(&self, edit: Box<dyn Edit>) -> Result<(), UndoError>;

    /// Reverts the most recent undoable entry.
    fn undo(&self) -> Result<(), UndoError>;

    /// Re-applies the most recently undone entry.
    fn redo(&self) -> Result<(), UndoError>;

    /// Starts buffering recorded edits into one compound edit.
    ///
    /// Returns `false` (and logs an error) if a compound edit is already
    /// being recorded on this manager; the call is then ignored.
    fn begin_compound_edit(&self, description: Option<&str>) -> bool;

    /// Closes the open compound edit and records it.
    ///
    /// The description given to [`begin_compound_edit`](Self::begin_compound_edit)
    /// wins; `description` is used when begin had none. Without any
    /// description this fails with [`UndoError::MissingCompoundDescription`].
    /// Calling it with no open compound edit logs an error and does nothing.
    fn finish_compound_edit(&self, description: Option<&str>) -> Result<(), UndoError>;

    /// Whether a compound edit is currently open on this manager.
    fn accumulates_compound_edit(&self) -> bool;

    /// Creates a child manager whose history is mirrored into this one.
    fn create_sub_manager(&self) -> EditHistory;

    /// Marks the current state as saved.
    fn saved_changes(&self);

    /// Clears both stacks and any open compound edit of this manager.
    fn reset(&self);

    /// Whether recording is enabled, taking all ancestors into account.
    fn is_active(&self) -> bool;

    fn set_active(&self, active: bool);

    fn can_undo(&self) -> Signal<bool>;

    fn can_redo(&self) -> Signal<bool>;

    /// `"Undo <description>"`, or `"Cannot undo"`.
    fn undo_text(&self) -> Signal<String>;

    /// `"Redo <description>"`, or `"Cannot redo"`.
    fn redo_text(&self) -> Signal<String>;

    /// `true` while the edit counter differs from the last save point.
    fn has_unsaved_changes(&self) -> Signal<bool>;
}
