//! # History Demo
//!
//! Runs an editing session from a script file or standard input and prints
//! the history state after every command.
//!
//! ```bash
//! echo "set x 5
//! undo
//! redo" | cargo run --bin history_demo
//!
//! cargo run --bin history_demo -- --max-undo 10 --script session.txt
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rewind_core::undo::{HistoryConfig, HistoryLabels};
use rewind_demos::session::Session;

/// Rewind history demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "history_demo",
    about = "Interactive undo/redo session",
    long_about = "Reads one command per line and prints the history after each.\n\n\
        COMMANDS:\n\
          set <name> <int>    set a variable\n\
          toggle <name>       flip a flag through an undoable action\n\
          begin [desc]        open a compound edit\n\
          finish [desc]       close it\n\
          undo | redo | save | reset | show\n\
          panel [name]        edit through a sub-manager, or the main history",
    version
)]
struct Args {
    /// Read commands from this file instead of standard input.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Maximum undo depth per manager.
    #[arg(long, default_value_t = rewind_core::undo::DEFAULT_MAX_UNDO)]
    max_undo: usize,

    /// Prefix of undo menu texts.
    #[arg(long, default_value = "Undo")]
    undo_prefix: String,

    /// Prefix of redo menu texts.
    #[arg(long, default_value = "Redo")]
    redo_prefix: String,

    /// Stop at the first failing command.
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn config(&self) -> HistoryConfig {
        HistoryConfig::default()
            .with_max_undo(self.max_undo)
            .with_labels(HistoryLabels {
                undo_prefix: self.undo_prefix.clone(),
                redo_prefix: self.redo_prefix.clone(),
                ..HistoryLabels::default()
            })
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting Rewind history demo");
    log::info!("Core version: {}", rewind_core::VERSION);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(err) => {
                log::error!("cannot open {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let mut session = match Session::new(args.config()) {
        Ok(session) => session,
        Err(err) => {
            log::error!("cannot start session: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (number, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("reading input failed: {err}");
                return ExitCode::FAILURE;
            }
        };
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }

        println!("> {line}");
        if let Err(err) = session.run_line(line) {
            println!("  error: {err}");
            if args.strict {
                log::error!("line {}: {err}", number + 1);
                return ExitCode::FAILURE;
            }
        }
        print!("{}", session.status());
    }

    ExitCode::SUCCESS
}
