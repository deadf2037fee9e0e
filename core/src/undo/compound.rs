//! Edits grouped into one undo step.

use super::edit::{Edit, EditResult};

/// An ordered sequence of edits that undo and redo as one unit.
///
/// `redo` applies the children in recording order and `undo` in reverse
/// order. If a child fails, the children already processed in this call are
/// rolled back before the error is returned, so the compound either runs
/// completely or leaves the state as it found it.
#[derive(Debug)]
pub struct CompoundEdit {
    description: String,
    edits: Vec<Box<dyn Edit>>,
}

impl CompoundEdit {
    /// Creates a compound edit from `edits`, oldest first.
    pub fn new(description: impl Into<String>, edits: Vec<Box<dyn Edit>>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// Number of child edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if there are no child edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Child descriptions in recording order.
    pub fn child_descriptions(&self) -> impl Iterator<Item = &str> {
        self.edits.iter().map(|e| e.description())
    }
}

impl Edit for CompoundEdit {
    fn redo(&mut self) -> EditResult {
        for index in 0..self.edits.len() {
            if let Err(err) = self.edits[index].redo() {
                for done in self.edits[..index].iter_mut().rev() {
                    if let Err(rollback) = done.undo() {
                        log::error!(
                            "rolling back '{}' left '{}' applied: {rollback}",
                            self.description,
                            done.description()
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&mut self) -> EditResult {
        for index in (0..self.edits.len()).rev() {
            if let Err(err) = self.edits[index].undo() {
                for done in self.edits[index + 1..].iter_mut() {
                    if let Err(rollback) = done.redo() {
                        log::error!(
                            "rolling back '{}' left '{}' undone: {rollback}",
                            self.description,
                            done.description()
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn can_undo(&self) -> bool {
        self.edits.iter().all(|e| e.can_undo())
    }
}
