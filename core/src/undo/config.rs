//! History configuration.

/// Default maximum number of undo steps kept per manager.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Texts published through [`UndoManager::undo_text`](super::UndoManager::undo_text)
/// and [`UndoManager::redo_text`](super::UndoManager::redo_text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLabels {
    /// Prepended to the description of the next undoable entry.
    pub undo_prefix: String,
    /// Prepended to the description of the next redoable entry.
    pub redo_prefix: String,
    pub cannot_undo: String,
    pub cannot_redo: String,
}

impl Default for HistoryLabels {
    fn default() -> Self {
        Self {
            undo_prefix: "Undo".into(),
            redo_prefix: "Redo".into(),
            cannot_undo: "Cannot undo".into(),
            cannot_redo: "Cannot redo".into(),
        }
    }
}

impl HistoryLabels {
    pub fn undo_text(&self, description: Option<&str>) -> String {
        match description {
            Some(description) => format!("{} {description}", self.undo_prefix),
            None => self.cannot_undo.clone(),
        }
    }

    pub fn redo_text(&self, description: Option<&str>) -> String {
        match description {
            Some(description) => format!("{} {description}", self.redo_prefix),
            None => self.cannot_redo.clone(),
        }
    }
}

/// Configuration of an [`EditHistory`](super::EditHistory).
///
/// Sub-managers share the configuration of the manager they were created
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum undo depth of each manager. When a push exceeds it, the
    /// oldest entry of that manager is dropped.
    pub max_undo: usize,
    pub labels: HistoryLabels,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            labels: HistoryLabels::default(),
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn with_max_undo(mut self, max_undo: usize) -> Self {
        self.max_undo = max_undo;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: HistoryLabels) -> Self {
        self.labels = labels;
        self
    }
}
