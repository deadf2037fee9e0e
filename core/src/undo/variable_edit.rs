//! Edits over reactive [`Variable`]s.

use std::fmt;

use crate::reactive::Variable;

use super::edit::{Edit, EditResult};
use super::manager::{UndoError, UndoManager};

/// Records that `variable` changed from `old_value` to `new_value`.
///
/// Consecutive edits of the same variable merge into one entry spanning the
/// first old value to the last new value, which turns a spinner drag into a
/// single undo step.
pub struct VariableEdit<T> {
    variable: Variable<T>,
    old_value: T,
    new_value: T,
    description: String,
}

impl<T: Clone + PartialEq + Send + 'static> VariableEdit<T> {
    pub fn new(
        variable: Variable<T>,
        old_value: T,
        new_value: T,
        description: impl Into<String>,
    ) -> Self {
        Self {
            variable,
            old_value,
            new_value,
            description: description.into(),
        }
    }

    /// Creates an edit for a change that already happened: the variable's
    /// current value is taken as the new value.
    pub fn changed(variable: Variable<T>, old_value: T, description: impl Into<String>) -> Self {
        let new_value = variable.get();
        Self::new(variable, old_value, new_value, description)
    }

    pub fn old_value(&self) -> &T {
        &self.old_value
    }

    pub fn new_value(&self) -> &T {
        &self.new_value
    }
}

impl<T: fmt::Debug> fmt::Debug for VariableEdit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableEdit")
            .field("description", &self.description)
            .field("old_value", &self.old_value)
            .field("new_value", &self.new_value)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + Send + fmt::Debug + 'static> Edit for VariableEdit<T> {
    fn redo(&mut self) -> EditResult {
        self.variable.set(self.new_value.clone());
        Ok(())
    }

    fn undo(&mut self) -> EditResult {
        self.variable.set(self.old_value.clone());
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn merge(&mut self, other: Box<dyn Edit>) -> Option<Box<dyn Edit>> {
        if let Some(later) = (*other).as_any().downcast_ref::<Self>()
            && later.variable.ptr_eq(&self.variable)
        {
            self.new_value = later.new_value.clone();
            self.description = later.description.clone();
            return None;
        }
        Some(other)
    }
}

/// Sets `variable` to `new_value` and records the change on `manager`.
///
/// Does nothing if the variable already holds `new_value`.
pub fn update_variable<T, M>(
    variable: &Variable<T>,
    new_value: T,
    manager: &M,
    description: impl Into<String>,
) -> Result<(), UndoError>
where
    T: Clone + PartialEq + Send + fmt::Debug + 'static,
    M: UndoManager + ?Sized,
{
    let old_value = variable.get();
    if old_value == new_value {
        return Ok(());
    }
    manager.record(Box::new(VariableEdit::new(
        variable.clone(),
        old_value,
        new_value.clone(),
        description,
    )))?;
    variable.set(new_value);
    Ok(())
}

/// Flips a boolean variable. Undo and redo both invert the current value.
pub struct ToggleEdit {
    variable: Variable<bool>,
    description: String,
}

impl ToggleEdit {
    pub fn new(description: impl Into<String>, variable: Variable<bool>) -> Self {
        Self {
            variable,
            description: description.into(),
        }
    }

    fn toggle(&self) -> EditResult {
        self.variable.update(|value| *value = !*value);
        Ok(())
    }
}

impl fmt::Debug for ToggleEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleEdit")
            .field("description", &self.description)
            .field("value", &self.variable.get())
            .finish()
    }
}

impl Edit for ToggleEdit {
    fn redo(&mut self) -> EditResult {
        self.toggle()
    }

    fn undo(&mut self) -> EditResult {
        self.toggle()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
