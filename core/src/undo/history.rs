//! Hierarchical undo/redo history.
//!
//! [`EditHistory`] manages a linear undo/redo stack of [`Edit`] trait objects.
//! When a new edit is recorded after undoing, the redo stack is cleared
//! (standard editor behavior).
//!
//! # Sub-managers
//!
//! [`create_sub_manager`](UndoManager::create_sub_manager) returns a child
//! history with its own stacks. Everything recorded on the child is also
//! pushed onto every ancestor, so an undo issued on any level finds edits made
//! further down:
//!
//! ```text
//! root.record(a)      root: [a]        child: []
//! child.record(b)     root: [a, b]     child: [b]
//! root.undo()         root: [a] | b    child: [] | b
//! ```
//!
//! Each entry remembers the managers that held it when it was recorded (its
//! origin and the origin's ancestors, as weak handles). Undo, redo and redo
//! invalidation move the entry through exactly those managers, so the parent
//! never needs to know its children.
//!
//! # Transactions
//!
//! Undo and redo run the edit first and only commit the stack bookkeeping if
//! it succeeded; a failing edit leaves the history untouched.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::reactive::{Signal, Variable};

use super::compound::CompoundEdit;
use super::config::HistoryConfig;
use super::edit::{Edit, EditResult};
use super::manager::{UndoError, UndoManager};
use super::scope::ActivitySuspension;

/// One recorded edit, shared by every stack that holds it.
struct Entry {
    /// The recording manager followed by its ancestors at recording time.
    holders: Vec<Weak<Node>>,
    /// Cached description, readable without locking the edit.
    label: Mutex<String>,
    edit: Mutex<Box<dyn Edit>>,
}

impl Entry {
    fn new(chain: &[Arc<Node>], edit: Box<dyn Edit>) -> Self {
        Self {
            holders: chain.iter().map(Arc::downgrade).collect(),
            label: Mutex::new(edit.description().to_owned()),
            edit: Mutex::new(edit),
        }
    }

    fn recorded_by(&self, node: &Arc<Node>) -> bool {
        self.holders
            .first()
            .is_some_and(|origin| std::ptr::eq(origin.as_ptr(), Arc::as_ptr(node)))
    }

    fn description(&self) -> String {
        self.label.lock().clone()
    }

    /// Live managers holding this entry, falling back to `chain` if none of
    /// them survived.
    fn live_holders(&self, chain: &[Arc<Node>]) -> Vec<Arc<Node>> {
        let live: Vec<_> = self.holders.iter().filter_map(Weak::upgrade).collect();
        if live.is_empty() { chain.to_vec() } else { live }
    }
}

struct PendingCompound {
    description: Option<String>,
    edits: Vec<Box<dyn Edit>>,
}

struct State {
    /// Most recent entry at the back.
    undoable: VecDeque<Arc<Entry>>,
    /// Most recent entry at the back.
    redoable: VecDeque<Arc<Entry>>,
    edit_count: i64,
    compound: Option<PendingCompound>,
    active: bool,
}

struct Outputs {
    can_undo: Variable<bool>,
    can_redo: Variable<bool>,
    undo_text: Variable<String>,
    redo_text: Variable<String>,
    has_unsaved_changes: Variable<bool>,
}

struct Node {
    parent: Option<Weak<Node>>,
    config: Arc<HistoryConfig>,
    state: Mutex<State>,
    outputs: Outputs,
}

impl Node {
    fn new(parent: Option<Weak<Node>>, config: Arc<HistoryConfig>) -> Self {
        let labels = &config.labels;
        let outputs = Outputs {
            can_undo: Variable::new(false),
            can_redo: Variable::new(false),
            undo_text: Variable::new(labels.undo_text(None)),
            redo_text: Variable::new(labels.redo_text(None)),
            has_unsaved_changes: Variable::new(false),
        };
        Self {
            parent,
            config,
            state: Mutex::new(State {
                undoable: VecDeque::new(),
                redoable: VecDeque::new(),
                edit_count: 0,
                compound: None,
                active: true,
            }),
            outputs,
        }
    }

    fn parent(&self) -> Option<Arc<Node>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn top_undoable_is(&self, entry: &Arc<Entry>) -> bool {
        self.state
            .lock()
            .undoable
            .back()
            .is_some_and(|top| Arc::ptr_eq(top, entry))
    }

    /// Publishes the current stack state. Never called with `state` locked,
    /// so subscribers may call back into the manager.
    fn refresh(&self) {
        let (undo_top, redo_top, dirty) = {
            let state = self.state.lock();
            (
                state.undoable.back().map(|e| e.description()),
                state.redoable.back().map(|e| e.description()),
                state.edit_count != 0,
            )
        };
        let labels = &self.config.labels;
        self.outputs.can_redo.set(redo_top.is_some());
        self.outputs
            .redo_text
            .set(labels.redo_text(redo_top.as_deref()));
        self.outputs.can_undo.set(undo_top.is_some());
        self.outputs
            .undo_text
            .set(labels.undo_text(undo_top.as_deref()));
        self.outputs.has_unsaved_changes.set(dirty);
    }
}

/// `node` followed by all of its live ancestors.
fn lineage(node: &Arc<Node>) -> Vec<Arc<Node>> {
    let mut chain = vec![Arc::clone(node)];
    let mut current = Arc::clone(node);
    while let Some(parent) = current.parent() {
        chain.push(Arc::clone(&parent));
        current = parent;
    }
    chain
}

fn refresh_all<'a>(nodes: impl IntoIterator<Item = &'a Arc<Node>>) {
    for node in nodes {
        node.refresh();
    }
}

/// Removes `entry` from `stack`, returning whether it was there.
fn remove_entry(stack: &mut VecDeque<Arc<Entry>>, entry: &Arc<Entry>) -> bool {
    match stack.iter().rposition(|e| Arc::ptr_eq(e, entry)) {
        Some(index) => stack.remove(index).is_some(),
        None => false,
    }
}

/// Pushes onto an undo stack, dropping the oldest entry past `max_undo`.
fn push_undoable(state: &mut State, entry: Arc<Entry>, max_undo: usize) {
    state.undoable.push_back(entry);
    while state.undoable.len() > max_undo {
        if let Some(dropped) = state.undoable.pop_front() {
            log::trace!("history full, dropping '{}'", dropped.description());
        }
    }
}

/// Clears the redo stacks of `chain`, removing each discarded entry from every
/// manager that held it. Returns the managers touched outside `chain`.
fn discard_redo(chain: &[Arc<Node>]) -> Vec<Arc<Node>> {
    let mut discarded = VecDeque::new();
    for node in chain {
        discarded.append(&mut node.state.lock().redoable);
    }

    let mut touched: Vec<Arc<Node>> = Vec::new();
    for entry in &discarded {
        for holder in entry.holders.iter().filter_map(Weak::upgrade) {
            let removed = remove_entry(&mut holder.state.lock().redoable, entry);
            if removed && !touched.iter().any(|n| Arc::ptr_eq(n, &holder)) {
                touched.push(holder);
            }
        }
    }
    if !discarded.is_empty() {
        log::trace!("discarded {} redoable entries", discarded.len());
    }
    touched
}

/// Manages an undo/redo history of [`Edit`]s.
///
/// `EditHistory` is a cheap handle: clones refer to the same manager. Use
/// [`UndoManager::create_sub_manager`] for a child history that shares its
/// edits with this one.
///
/// # Example
///
/// ```
/// use rewind_core::reactive::Variable;
/// use rewind_core::undo::{update_variable, EditHistory, UndoManager};
///
/// let history = EditHistory::new();
/// let x = Variable::new(0);
///
/// update_variable(&x, 5, &history, "Set 5")?;
/// assert_eq!(history.undo_text().get(), "Undo Set 5");
///
/// history.undo()?;
/// assert_eq!(x.get(), 0);
/// assert_eq!(history.redo_text().get(), "Redo Set 5");
///
/// history.redo()?;
/// assert_eq!(x.get(), 5);
/// # Ok::<(), rewind_core::undo::UndoError>(())
/// ```
#[derive(Clone)]
pub struct EditHistory {
    node: Arc<Node>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Creates an empty root history with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            node: Arc::new(Node::new(None, Arc::new(config))),
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.node.config
    }

    /// The manager this one was created from, if it is still alive.
    pub fn parent(&self) -> Option<EditHistory> {
        self.node.parent().map(|node| EditHistory { node })
    }

    /// Returns `true` if both handles refer to the same manager.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Returns the number of entries in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.node.state.lock().undoable.len()
    }

    /// Returns the number of entries in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.node.state.lock().redoable.len()
    }

    /// Distance from the last save point, in recorded entries.
    pub fn edit_count(&self) -> i64 {
        self.node.state.lock().edit_count
    }

    /// Undo entry descriptions, most recent first.
    pub fn undo_descriptions(&self) -> Vec<String> {
        let entries: Vec<_> = self.node.state.lock().undoable.iter().cloned().collect();
        entries.iter().rev().map(|e| e.description()).collect()
    }

    /// Redo entry descriptions, most recent first.
    pub fn redo_descriptions(&self) -> Vec<String> {
        let entries = self.node.state.lock().redoable.clone();
        entries.iter().rev().map(|e| e.description()).collect()
    }

    fn chain(&self) -> Vec<Arc<Node>> {
        lineage(&self.node)
    }

    fn compound_open_in(chain: &[Arc<Node>]) -> bool {
        chain.iter().any(|node| node.state.lock().compound.is_some())
    }

    /// Runs `apply` on `entry` with recording disabled for the whole tree,
    /// so edits that write through observed variables are not re-recorded.
    fn replay(
        root: &Arc<Node>,
        entry: &Entry,
        apply: impl FnOnce(&mut dyn Edit) -> EditResult,
    ) -> Result<(), UndoError> {
        let root = EditHistory {
            node: Arc::clone(root),
        };
        let _suspended = ActivitySuspension::new(&root);
        let mut edit = entry.edit.lock();
        apply(&mut **edit)?;
        Ok(())
    }
}

impl UndoManager for EditHistory {
    fn record(&self, mut edit: Box<dyn Edit>) -> Result<(), UndoError> {
        if !self.is_active() {
            log::trace!("recording disabled, ignoring '{}'", edit.description());
            return Ok(());
        }
        if !edit.can_undo() {
            return Err(UndoError::NotUndoable(edit.description().to_owned()));
        }

        let chain = self.chain();
        for node in &chain {
            if let Some(pending) = node.state.lock().compound.as_mut() {
                log::trace!("buffering '{}' into open compound edit", edit.description());
                pending.edits.push(edit);
                return Ok(());
            }
        }

        let touched = discard_redo(&chain);

        let top = self.node.state.lock().undoable.back().cloned();
        // The save point is never merged into, so undo can always return to it.
        if let Some(top) = top
            && top.recorded_by(&self.node)
            && chain[1..].iter().all(|ancestor| ancestor.top_undoable_is(&top))
            && chain.iter().all(|node| node.state.lock().edit_count != 0)
        {
            let mut target = top.edit.lock();
            match target.merge(edit) {
                None => {
                    let description = target.description().to_owned();
                    drop(target);
                    log::trace!("merged edit into '{description}'");
                    *top.label.lock() = description;
                    refresh_all(chain.iter().chain(&touched));
                    return Ok(());
                }
                Some(returned) => edit = returned,
            }
        }

        let entry = Arc::new(Entry::new(&chain, edit));
        log::trace!("recorded '{}'", entry.description());
        for node in &chain {
            let mut state = node.state.lock();
            state.edit_count += 1;
            push_undoable(&mut state, Arc::clone(&entry), node.config.max_undo);
        }
        refresh_all(chain.iter().chain(&touched));
        Ok(())
    }

    fn undo(&self) -> Result<(), UndoError> {
        let entry = self
            .node
            .state
            .lock()
            .undoable
            .back()
            .cloned()
            .ok_or(UndoError::NothingToUndo)?;
        let chain = self.chain();
        if Self::compound_open_in(&chain) {
            return Err(UndoError::CompoundInProgress);
        }

        let root = chain.last().unwrap_or(&self.node);
        Self::replay(root, &entry, |edit| edit.undo())?;

        let holders = entry.live_holders(&chain);
        for node in &holders {
            let mut state = node.state.lock();
            if remove_entry(&mut state.undoable, &entry) {
                state.redoable.push_back(Arc::clone(&entry));
                state.edit_count -= 1;
            }
        }
        log::trace!("undid '{}'", entry.description());
        refresh_all(&holders);
        Ok(())
    }

    fn redo(&self) -> Result<(), UndoError> {
        let entry = self
            .node
            .state
            .lock()
            .redoable
            .back()
            .cloned()
            .ok_or(UndoError::NothingToRedo)?;
        let chain = self.chain();
        if Self::compound_open_in(&chain) {
            return Err(UndoError::CompoundInProgress);
        }

        let root = chain.last().unwrap_or(&self.node);
        Self::replay(root, &entry, |edit| edit.redo())?;

        let holders = entry.live_holders(&chain);
        for node in &holders {
            let mut state = node.state.lock();
            if remove_entry(&mut state.redoable, &entry) {
                state.edit_count += 1;
                push_undoable(&mut state, Arc::clone(&entry), node.config.max_undo);
            }
        }
        log::trace!("redid '{}'", entry.description());
        refresh_all(&holders);
        Ok(())
    }

    fn begin_compound_edit(&self, description: Option<&str>) -> bool {
        let mut state = self.node.state.lock();
        if let Some(open) = &state.compound {
            log::error!(
                "compound edit already begun (description: {:?}, new: {description:?})",
                open.description
            );
            return false;
        }
        log::debug!("beginning compound edit {description:?}");
        state.compound = Some(PendingCompound {
            description: description.map(str::to_owned),
            edits: Vec::new(),
        });
        true
    }

    fn finish_compound_edit(&self, description: Option<&str>) -> Result<(), UndoError> {
        let pending = self.node.state.lock().compound.take();
        let Some(PendingCompound {
            description: begun,
            mut edits,
        }) = pending
        else {
            log::error!("no compound edit begun (description: {description:?})");
            return Ok(());
        };

        let description = begun
            .or_else(|| description.map(str::to_owned))
            .ok_or(UndoError::MissingCompoundDescription)?;
        log::debug!(
            "finishing compound edit '{description}' with {} edit(s)",
            edits.len()
        );

        if edits.len() > 1 {
            return self.record(Box::new(CompoundEdit::new(description, edits)));
        }
        match edits.pop() {
            Some(edit) => self.record(edit),
            None => Ok(()),
        }
    }

    fn accumulates_compound_edit(&self) -> bool {
        self.node.state.lock().compound.is_some()
    }

    fn create_sub_manager(&self) -> EditHistory {
        EditHistory {
            node: Arc::new(Node::new(
                Some(Arc::downgrade(&self.node)),
                Arc::clone(&self.node.config),
            )),
        }
    }

    fn saved_changes(&self) {
        self.node.state.lock().edit_count = 0;
        self.node.refresh();
    }

    fn reset(&self) {
        {
            let mut state = self.node.state.lock();
            state.undoable.clear();
            state.redoable.clear();
            state.compound = None;
        }
        self.node.refresh();
    }

    fn is_active(&self) -> bool {
        self.chain().iter().all(|node| node.state.lock().active)
    }

    fn set_active(&self, active: bool) {
        self.node.state.lock().active = active;
    }

    fn can_undo(&self) -> Signal<bool> {
        self.node.outputs.can_undo.signal()
    }

    fn can_redo(&self) -> Signal<bool> {
        self.node.outputs.can_redo.signal()
    }

    fn undo_text(&self) -> Signal<String> {
        self.node.outputs.undo_text.signal()
    }

    fn redo_text(&self) -> Signal<String> {
        self.node.outputs.redo_text.signal()
    }

    fn has_unsaved_changes(&self) -> Signal<bool> {
        self.node.outputs.has_unsaved_changes.signal()
    }
}

impl fmt::Debug for EditHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.node.state.lock();
        f.debug_struct("EditHistory")
            .field("undo_count", &state.undoable.len())
            .field("redo_count", &state.redoable.len())
            .field("edit_count", &state.edit_count)
            .field("active", &state.active)
            .field("compound", &state.compound.is_some())
            .field("sub_manager", &self.node.parent.is_some())
            .finish()
    }
}
