//! Parses shell input and carries out the resulting commands.

use crate::render;
use colored::Colorize;
use timerdeck::common::now_millis;
use timerdeck::export::RevealShare;
use timerdeck::prelude::*;

/// What to do with a single timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Start,
    Pause,
    Reset,
    Delete,
}

/// What to do with every timer of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOp {
    StartAll,
    PauseAll,
    ResetAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    AddTimer {
        category: usize,
        duration: String,
        name: String,
        halfway: bool,
    },
    AddCategory {
        name: String,
    },
    Timer {
        op: TimerOp,
        handle: usize,
    },
    Category {
        op: CategoryOp,
        handle: usize,
    },
    Toggle {
        handle: usize,
    },
    History {
        category: Option<String>,
    },
    Export,
    Help,
    Exit,
    Empty,
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub const HELP: &[(&str, &str)] = &[
    ("list", "Shows categories and their timers with handles."),
    ("add timer <C> <S> <NAME> [--halfway]", "Adds an S-second timer to category #C."),
    ("add category <NAME>", "Adds a new category."),
    ("start|pause|reset|delete <T>", "Acts on timer #T."),
    ("start|pause|reset all <C>", "Acts on every timer in category #C."),
    ("toggle <C>", "Expands or collapses category #C."),
    ("history [CATEGORY]", "Shows completed timers, newest first."),
    ("export", "Writes the history to a JSON file."),
    ("exit", "Quits the shell."),
];

/// Parses one input line. `Err` carries a usage hint.
pub fn parse(line: &str) -> Result<Command, String> {
    let args: Vec<&str> = line.split_whitespace().collect();
    let Some(command) = args.first() else {
        return Ok(Command::Empty);
    };

    match *command {
        "list" | "ls" => Ok(Command::List),
        "add" => match args.get(1) {
            Some(&"timer") => parse_add_timer(&args[2..]),
            Some(&"category") => {
                let name = args[2..].join(" ");
                if name.is_empty() {
                    Err("Usage: add category <NAME>".to_string())
                } else {
                    Ok(Command::AddCategory { name })
                }
            }
            _ => Err("Unknown 'add' command. Try 'add timer' or 'add category'.".to_string()),
        },
        "start" | "pause" | "reset" => {
            if let Some(&"all") = args.get(1) {
                let op = match *command {
                    "start" => CategoryOp::StartAll,
                    "pause" => CategoryOp::PauseAll,
                    _ => CategoryOp::ResetAll,
                };
                let handle = parse_handle(args.get(2), &format!("Usage: {} all <CATEGORY#>", command))?;
                Ok(Command::Category { op, handle })
            } else {
                let op = match *command {
                    "start" => TimerOp::Start,
                    "pause" => TimerOp::Pause,
                    _ => TimerOp::Reset,
                };
                let handle = parse_handle(args.get(1), &format!("Usage: {} <TIMER#>", command))?;
                Ok(Command::Timer { op, handle })
            }
        }
        "delete" | "rm" => {
            let handle = parse_handle(args.get(1), "Usage: delete <TIMER#>")?;
            Ok(Command::Timer {
                op: TimerOp::Delete,
                handle,
            })
        }
        "toggle" => {
            let handle = parse_handle(args.get(1), "Usage: toggle <CATEGORY#>")?;
            Ok(Command::Toggle { handle })
        }
        "history" => {
            let category = args[1..].join(" ");
            Ok(Command::History {
                category: (!category.is_empty()).then_some(category),
            })
        }
        "export" => Ok(Command::Export),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        _ => Err(format!("Unknown command: '{}'. Type 'help'.", line.trim())),
    }
}

fn parse_add_timer(args: &[&str]) -> Result<Command, String> {
    const USAGE: &str = "Usage: add timer <CATEGORY#> <SECONDS> <NAME> [--halfway]";
    let category = parse_handle(args.first(), USAGE)?;
    let duration = args.get(1).ok_or_else(|| USAGE.to_string())?.to_string();
    let halfway = args.contains(&"--halfway");
    let name = args
        .iter()
        .skip(2)
        .filter(|word| **word != "--halfway")
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Command::AddTimer {
        category,
        duration,
        name,
        halfway,
    })
}

fn parse_handle(arg: Option<&&str>, usage: &str) -> Result<usize, String> {
    match arg {
        Some(raw) => match raw.trim_start_matches('#').parse::<usize>() {
            Ok(handle) if handle > 0 => Ok(handle),
            _ => Err(format!("Error: '{}' is not a valid handle. {}", raw, usage)),
        },
        None => Err(usage.to_string()),
    }
}

/// Carries out `command` against the engine's store.
pub async fn execute(command: Command, engine: &TimerEngine, config: &TimerdeckConfig) -> Flow {
    let store = engine.store();
    let state = store.read().await.snapshot();

    match command {
        Command::Empty => {}
        Command::Exit => return Flow::Exit,
        Command::Help => {
            println!("Available commands:");
            for (usage, text) in HELP {
                println!("  {:<40} - {}", usage, text);
            }
        }
        Command::List => render::print_deck(&state),
        Command::AddTimer {
            category,
            duration,
            name,
            halfway,
        } => {
            let Some(category) = state.categories.get(category - 1) else {
                println!("Error: Invalid category #{}. Use 'list' to see categories.", category);
                return Flow::Continue;
            };
            let draft = TimerDraft {
                name,
                duration,
                category_id: category.id.to_string(),
                halfway_alert: halfway,
            };
            match draft.into_timer(now_millis()) {
                Some(timer) => {
                    println!("--> Added \"{}\" to {}.", timer.name, category.name);
                    engine.dispatch(Action::AddTimer(timer)).await;
                }
                None => println!("{}", "Nothing added: a name and a positive whole number of seconds are needed.".dimmed()),
            }
        }
        Command::AddCategory { name } => {
            if let Some(category) = (CategoryDraft { name }).into_category(now_millis()) {
                println!("--> Added category \"{}\".", category.name);
                engine.dispatch(Action::AddCategory(category)).await;
            }
        }
        Command::Timer { op, handle } => {
            let handles = render::timer_handles(&state);
            let Some(id) = handles.get(handle - 1).cloned() else {
                println!("Error: Invalid timer #{}. Use 'list' to see timers.", handle);
                return Flow::Continue;
            };
            let action = match op {
                TimerOp::Start => Action::StartTimer(id),
                TimerOp::Pause => Action::PauseTimer(id),
                TimerOp::Reset => Action::ResetTimer(id),
                TimerOp::Delete => Action::DeleteTimer(id),
            };
            if !engine.dispatch(action).await {
                println!("{}", "Nothing changed.".dimmed());
            }
        }
        Command::Category { op, handle } => {
            let Some(category) = state.categories.get(handle - 1) else {
                println!("Error: Invalid category #{}. Use 'list' to see categories.", handle);
                return Flow::Continue;
            };
            let id = category.id.clone();
            let action = match op {
                CategoryOp::StartAll => Action::StartCategoryTimers(id),
                CategoryOp::PauseAll => Action::PauseCategoryTimers(id),
                CategoryOp::ResetAll => Action::ResetCategoryTimers(id),
            };
            if !engine.dispatch(action).await {
                println!("{}", "Nothing changed.".dimmed());
            }
        }
        Command::Toggle { handle } => match state.categories.get(handle - 1) {
            Some(category) => {
                engine
                    .dispatch(Action::ToggleCategoryExpanded(category.id.clone()))
                    .await;
            }
            None => println!("Error: Invalid category #{}.", handle),
        },
        Command::History { category } => {
            render::print_history(&state.logs, category.as_deref(), config.display.timezone)
        }
        Command::Export => match export_logs(&state.logs, &config.export, &RevealShare) {
            Ok(path) => println!("--> Exported {} entries to {}", state.logs.len(), path.display()),
            Err(ExportError::ShareUnavailable) => render::print_notice(
                "Sharing not available",
                "Sharing is not available on this device",
            ),
            Err(_) => render::print_notice("Export Failed", "Failed to export timer history"),
        },
    }
    Flow::Continue
}
