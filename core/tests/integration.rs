use std::sync::Arc;

use parking_lot::Mutex;

use rewind_core::reactive::Variable;
use rewind_core::undo::{
    CompoundEdit, Edit, EditError, EditHistory, EditResult, HistoryConfig, UndoError,
    UndoManager, VariableEdit, compound_edit, update_variable, without_undo,
};

fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// A small document: a title and a list of shapes, each edited through the
/// document's own history.
struct Document {
    history: EditHistory,
    title: Variable<String>,
    shapes: Variable<Vec<String>>,
}

impl Document {
    fn new() -> Self {
        Self {
            history: EditHistory::new(),
            title: Variable::new("Untitled".to_owned()),
            shapes: Variable::new(Vec::new()),
        }
    }

    fn rename(&self, title: &str) {
        update_variable(&self.title, title.to_owned(), &self.history, "Rename").unwrap();
    }

    fn add_shape(&self, shape: &str) {
        let mut shapes = self.shapes.get();
        shapes.push(shape.to_owned());
        update_variable(&self.shapes, shapes, &self.history, format!("Add {shape}")).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Editing session
// ---------------------------------------------------------------------------

#[test]
fn editing_session() {
    init_logging();
    let doc = Document::new();

    doc.rename("Draft");
    doc.rename("Final");
    assert_eq!(doc.history.undo_count(), 1, "renames coalesce");

    compound_edit(&doc.history, "Add shapes", || {
        doc.add_shape("circle");
        doc.add_shape("square");
    })
    .unwrap();

    assert_eq!(
        doc.history.undo_descriptions(),
        vec!["Add shapes".to_owned(), "Rename".to_owned()]
    );

    doc.history.undo().unwrap();
    assert!(doc.shapes.get().is_empty());
    doc.history.undo().unwrap();
    assert_eq!(doc.title.get(), "Untitled");

    doc.history.redo().unwrap();
    doc.history.redo().unwrap();
    assert_eq!(doc.title.get(), "Final");
    assert_eq!(doc.shapes.get(), vec!["circle", "square"]);
}

#[test]
fn save_point_tracks_undo_and_redo() {
    let doc = Document::new();
    let dirty = doc.history.has_unsaved_changes();

    doc.add_shape("circle");
    doc.history.saved_changes();
    assert!(!dirty.get());

    doc.history.undo().unwrap();
    assert!(dirty.get());
    doc.history.redo().unwrap();
    assert!(!dirty.get());

    doc.add_shape("square");
    assert!(dirty.get());
}

#[test]
fn menu_texts_follow_history() {
    let doc = Document::new();
    let undo_text = doc.history.undo_text();
    let redo_text = doc.history.redo_text();

    assert_eq!(undo_text.get(), "Cannot undo");
    doc.add_shape("circle");
    assert_eq!(undo_text.get(), "Undo Add circle");

    doc.history.undo().unwrap();
    assert_eq!(undo_text.get(), "Cannot undo");
    assert_eq!(redo_text.get(), "Redo Add circle");
}

// ---------------------------------------------------------------------------
// Sub-managers
// ---------------------------------------------------------------------------

#[test]
fn panels_share_the_window_history() {
    let window = EditHistory::new();
    let inspector = window.create_sub_manager();
    let outline = window.create_sub_manager();

    let width = Variable::new(10);
    let name = Variable::new("node".to_owned());

    update_variable(&width, 20, &inspector, "Set width").unwrap();
    update_variable(&name, "root".to_owned(), &outline, "Rename node").unwrap();

    assert_eq!(window.undo_count(), 2);
    assert!(inspector.can_undo().get());

    // Undoing in the window walks back across both panels.
    window.undo().unwrap();
    assert_eq!(name.get(), "node");
    assert!(!outline.can_undo().get());
    assert!(outline.can_redo().get());
    assert!(inspector.can_undo().get());

    window.undo().unwrap();
    assert_eq!(width.get(), 10);
    assert!(inspector.can_redo().get());

    // A new edit in one panel invalidates what the window could redo.
    update_variable(&width, 30, &inspector, "Set width").unwrap();
    assert!(!window.can_redo().get());
    assert!(!outline.can_redo().get());
}

#[test]
fn disabling_parent_disables_children() {
    let window = EditHistory::new();
    let panel = window.create_sub_manager();
    let value = Variable::new(0);

    without_undo(&window, || {
        update_variable(&value, 1, &panel, "ignored").unwrap();
    });
    assert_eq!(value.get(), 1);
    assert_eq!(panel.undo_count(), 0);
    assert_eq!(window.undo_count(), 0);
}

#[test]
fn sub_manager_inherits_config() {
    let window = EditHistory::with_config(HistoryConfig::default().with_max_undo(3));
    let panel = window.create_sub_manager();
    assert_eq!(panel.config().max_undo, 3);
    assert!(panel.parent().is_some_and(|p| p.ptr_eq(&window)));
}

// ---------------------------------------------------------------------------
// Failing edits
// ---------------------------------------------------------------------------

/// Writes into a shared log and can be told to fail.
#[derive(Debug)]
struct Step {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    fail: Arc<Mutex<bool>>,
}

impl Step {
    fn run(&self, verb: &str) -> EditResult {
        if *self.fail.lock() {
            return Err(EditError::InvalidState(format!("{} is locked", self.name)));
        }
        self.log.lock().push(format!("{verb} {}", self.name));
        Ok(())
    }
}

impl Edit for Step {
    fn redo(&mut self) -> EditResult {
        self.run("redo")
    }

    fn undo(&mut self) -> EditResult {
        self.run("undo")
    }

    fn description(&self) -> &str {
        self.name
    }
}

#[test]
fn failed_compound_undo_keeps_history_consistent() {
    init_logging();
    let history = EditHistory::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let ok = Arc::new(Mutex::new(false));
    let locked = Arc::new(Mutex::new(false));

    let edits: Vec<Box<dyn Edit>> = vec![
        Box::new(Step {
            name: "a",
            log: Arc::clone(&log),
            fail: Arc::clone(&locked),
        }),
        Box::new(Step {
            name: "b",
            log: Arc::clone(&log),
            fail: Arc::clone(&ok),
        }),
    ];
    history
        .record(Box::new(CompoundEdit::new("Both", edits)))
        .unwrap();

    *locked.lock() = true;
    assert_eq!(
        history.undo(),
        Err(UndoError::Edit(EditError::InvalidState("a is locked".into())))
    );
    assert_eq!(*log.lock(), vec!["undo b", "redo b"]);
    assert_eq!(history.undo_count(), 1);
    assert!(history.can_undo().get());

    *locked.lock() = false;
    log.lock().clear();
    history.undo().unwrap();
    assert_eq!(*log.lock(), vec!["undo b", "undo a"]);
    assert_eq!(history.redo_text().get(), "Redo Both");
}

#[test]
fn recorded_edit_is_not_reapplied() {
    let history = EditHistory::new();
    let counter = Variable::new(0);

    counter.set(1);
    history
        .record(Box::new(VariableEdit::new(counter.clone(), 0, 1, "Increment")))
        .unwrap();
    assert_eq!(counter.version(), 1);
}
