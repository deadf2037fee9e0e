//! Serialized access to an [`UndoManager`] from several threads.

use parking_lot::ReentrantMutex;

use crate::reactive::Signal;

use super::edit::Edit;
use super::history::EditHistory;
use super::manager::{UndoError, UndoManager};

/// Wraps a manager so that `record`, `undo` and `redo` never interleave.
///
/// The lock is reentrant: an edit being undone on one thread may call back
/// into the same manager without deadlocking. All other methods delegate
/// directly to the inner manager.
///
/// ```
/// use std::sync::Arc;
/// use rewind_core::reactive::Variable;
/// use rewind_core::undo::{update_variable, ConcurrentUndoManager, EditHistory, UndoManager};
///
/// let history = Arc::new(ConcurrentUndoManager::new(EditHistory::new()));
/// let counter = Variable::new(0);
///
/// let worker = {
///     let history = Arc::clone(&history);
///     let counter = counter.clone();
///     std::thread::spawn(move || update_variable(&counter, 1, &*history, "Increment"))
/// };
/// worker.join().unwrap()?;
///
/// history.undo()?;
/// assert_eq!(counter.get(), 0);
/// # Ok::<(), rewind_core::undo::UndoError>(())
/// ```
pub struct ConcurrentUndoManager<M> {
    inner: M,
    lock: ReentrantMutex<()>,
}

impl<M: UndoManager> ConcurrentUndoManager<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            lock: ReentrantMutex::new(()),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for ConcurrentUndoManager<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentUndoManager")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<M: UndoManager> UndoManager for ConcurrentUndoManager<M> {
    fn record(&self, edit: Box<dyn Edit>) -> Result<(), UndoError> {
        let _guard = self.lock.lock();
        self.inner.record(edit)
    }

    fn undo(&self) -> Result<(), UndoError> {
        let _guard = self.lock.lock();
        self.inner.undo()
    }

    fn redo(&self) -> Result<(), UndoError> {
        let _guard = self.lock.lock();
        self.inner.redo()
    }

    fn begin_compound_edit(&self, description: Option<&str>) -> bool {
        self.inner.begin_compound_edit(description)
    }

    fn finish_compound_edit(&self, description: Option<&str>) -> Result<(), UndoError> {
        self.inner.finish_compound_edit(description)
    }

    fn accumulates_compound_edit(&self) -> bool {
        self.inner.accumulates_compound_edit()
    }

    fn create_sub_manager(&self) -> EditHistory {
        self.inner.create_sub_manager()
    }

    fn saved_changes(&self) {
        self.inner.saved_changes();
    }

    fn reset(&self) {
        self.inner.reset();
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn set_active(&self, active: bool) {
        self.inner.set_active(active);
    }

    fn can_undo(&self) -> Signal<bool> {
        self.inner.can_undo()
    }

    fn can_redo(&self) -> Signal<bool> {
        self.inner.can_redo()
    }

    fn undo_text(&self) -> Signal<String> {
        self.inner.undo_text()
    }

    fn redo_text(&self) -> Signal<String> {
        self.inner.redo_text()
    }

    fn has_unsaved_changes(&self) -> Signal<bool> {
        self.inner.has_unsaved_changes()
    }
}
