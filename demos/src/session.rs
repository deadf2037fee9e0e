//! A scriptable editing session over named integer variables and flags.
//!
//! Every command is one line:
//!
//! ```text
//! set width 5        toggle grid        begin Resize       finish
//! undo               redo               save               reset
//! panel inspector    panel              show
//! ```
//!
//! `panel <name>` switches edits to a sub-manager of the main history,
//! `panel` without a name switches back.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use rewind_actions::{Action, ActionError, Category, ContextualizedAction};
use rewind_core::reactive::Variable;
use rewind_core::undo::{EditHistory, HistoryConfig, UndoError, UndoManager, update_variable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{0}' is not an integer")]
    InvalidValue(String),
    #[error(transparent)]
    Undo(#[from] UndoError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { name: String, value: i64 },
    Toggle(String),
    Begin(Option<String>),
    Finish(Option<String>),
    Undo,
    Redo,
    Save,
    Reset,
    Panel(Option<String>),
    Show,
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let rest = words.collect::<Vec<_>>().join(" ");
        let rest = (!rest.is_empty()).then_some(rest);

        let command = match verb {
            "set" => {
                let rest = rest.ok_or(SessionError::MissingArgument {
                    command: "set",
                    expected: "a name and a value",
                })?;
                let (name, value) = rest.split_once(' ').ok_or(SessionError::MissingArgument {
                    command: "set",
                    expected: "a value",
                })?;
                let value = value
                    .trim()
                    .parse()
                    .map_err(|_| SessionError::InvalidValue(value.trim().to_owned()))?;
                Self::Set {
                    name: name.to_owned(),
                    value,
                }
            }
            "toggle" => Self::Toggle(rest.ok_or(SessionError::MissingArgument {
                command: "toggle",
                expected: "a flag name",
            })?),
            "begin" => Self::Begin(rest),
            "finish" => Self::Finish(rest),
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "save" => Self::Save,
            "reset" => Self::Reset,
            "panel" => Self::Panel(rest),
            "show" | "" => Self::Show,
            other => return Err(SessionError::UnknownCommand(other.to_owned())),
        };
        Ok(command)
    }
}

/// Context of the toggle action: the flag and the manager it is recorded on.
#[derive(Clone)]
struct FlagContext {
    flag: Variable<bool>,
    manager: Arc<EditHistory>,
}

/// The main history, its panels and the values they edit.
pub struct Session {
    history: Arc<EditHistory>,
    panels: BTreeMap<String, Arc<EditHistory>>,
    active_panel: Option<String>,
    variables: BTreeMap<String, Variable<i64>>,
    flags: BTreeMap<String, Variable<bool>>,
    toggle: Action<FlagContext>,
}

impl Session {
    pub fn new(config: HistoryConfig) -> Result<Self, SessionError> {
        let toggle = Action::builder("toggle")
            .category(Category::Edit)
            .description("Toggle flag")
            .toggles(|ctx: &FlagContext| ctx.flag.clone())
            .undoable(|ctx: &FlagContext| {
                Some(Arc::clone(&ctx.manager) as Arc<dyn UndoManager>)
            })
            .build()?;
        Ok(Self {
            history: Arc::new(EditHistory::with_config(config)),
            panels: BTreeMap::new(),
            active_panel: None,
            variables: BTreeMap::new(),
            flags: BTreeMap::new(),
            toggle,
        })
    }

    /// The manager edits currently go to.
    pub fn manager(&self) -> &Arc<EditHistory> {
        self.active_panel
            .as_ref()
            .and_then(|name| self.panels.get(name))
            .unwrap_or(&self.history)
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn value(&self, name: &str) -> Option<i64> {
        self.variables.get(name).map(Variable::get)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).map(Variable::get)
    }

    pub fn run_line(&mut self, line: &str) -> Result<(), SessionError> {
        let command = line.parse()?;
        self.run(command)
    }

    pub fn run(&mut self, command: Command) -> Result<(), SessionError> {
        log::debug!("running {command:?}");
        match command {
            Command::Set { name, value } => {
                let variable = self
                    .variables
                    .entry(name.clone())
                    .or_insert_with(|| Variable::new(0))
                    .clone();
                update_variable(&variable, value, &**self.manager(), format!("Set {name}"))?;
            }
            Command::Toggle(name) => {
                let flag = self
                    .flags
                    .entry(name)
                    .or_insert_with(|| Variable::new(false))
                    .clone();
                self.toggle_action(flag).execute()?;
            }
            Command::Begin(description) => {
                self.manager().begin_compound_edit(description.as_deref());
            }
            Command::Finish(description) => {
                self.manager().finish_compound_edit(description.as_deref())?;
            }
            Command::Undo => self.manager().undo()?,
            Command::Redo => self.manager().redo()?,
            Command::Save => self.history.saved_changes(),
            Command::Reset => self.manager().reset(),
            Command::Panel(Some(name)) => {
                let history = &self.history;
                self.panels
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(history.create_sub_manager()));
                log::info!("editing in panel '{name}'");
                self.active_panel = Some(name);
            }
            Command::Panel(None) => {
                log::info!("editing in the main history");
                self.active_panel = None;
            }
            Command::Show => {}
        }
        Ok(())
    }

    fn toggle_action(&self, flag: Variable<bool>) -> ContextualizedAction<FlagContext> {
        self.toggle.with_context(FlagContext {
            flag,
            manager: Arc::clone(self.manager()),
        })
    }

    /// A multi-line summary of values and history state.
    pub fn status(&self) -> String {
        let mut out = String::new();
        for (name, variable) in &self.variables {
            let _ = writeln!(out, "  {name} = {}", variable.get());
        }
        for (name, flag) in &self.flags {
            let _ = writeln!(out, "  {name} = {}", flag.get());
        }

        let manager = self.manager();
        let _ = writeln!(
            out,
            "[{}] {} | {}{}",
            self.active_panel.as_deref().unwrap_or("main"),
            manager.undo_text().get(),
            manager.redo_text().get(),
            if self.history.has_unsaved_changes().get() {
                " | modified"
            } else {
                ""
            }
        );
        for description in manager.undo_descriptions() {
            let _ = writeln!(out, "    undo: {description}");
        }
        for description in manager.redo_descriptions() {
            let _ = writeln!(out, "    redo: {description}");
        }
        out
    }
}
