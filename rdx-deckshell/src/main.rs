mod commands;
mod render;

use anyhow::Result;
use colored::Colorize;
use commands::Flow;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use timerdeck::prelude::*;
use timerdeck::{ENGINE_NAME, VERSION as LIB_VERSION};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    // `logo.log` sits in the root of the `rdx-deckshell` crate.
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-".repeat(72).dimmed());
    println!("{}", version_string);
    println!("{}", "-".repeat(72).dimmed());
}

/// Writes the prompt again after a notice and flushes it, since it has no newline.
fn redraw_prompt(out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "{}", ">> ".cyan().bold())?;
    out.flush()
}

/// Shows every alert as a notice above the prompt.
async fn register_alert_notices(engine: &TimerEngine) -> ListenerId {
    engine
        .on_alert(
            AlertFilter::All,
            |alert| {
                render::print_notice(alert.title(), &alert.message());
                redraw_prompt(&mut std::io::stdout()).ok();
            },
            false,
        )
        .await
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    let config_path = env::var("TIMERDECK_CONFIG").ok().map(PathBuf::from);
    let config = TimerdeckConfig::load(config_path.as_deref())?;

    // Logs go to stderr so they do not tangle with the prompt.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let repository = JsonFileRepository::from_config(&config.storage)?;
    info!(path = %repository.path().display(), "Using state snapshot");
    let mut store = Store::new(Box::new(repository));
    store.hydrate();

    let engine = TimerEngine::new(config.clone(), store.shared());
    register_alert_notices(&engine).await;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let runner = engine.clone();
    info!("Spawning {} engine in the background...", ENGINE_NAME);
    let engine_task = tokio::spawn(async move { runner.run_until(shutdown_rx).await });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let flow = match commands::parse(&line) {
                    Ok(command) => commands::execute(command, &engine, &config).await,
                    Err(usage) => {
                        println!("{}", usage);
                        Flow::Continue
                    }
                };
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    println!("Exiting deckshell...");
    shutdown_tx.send(()).ok();
    engine_task.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingOut {
        written: Vec<u8>,
        flushed: usize,
    }

    impl Write for RecordingOut {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed += 1;
            Ok(())
        }
    }

    #[test]
    fn redrawn_prompt_is_flushed() {
        let mut out = RecordingOut::default();
        redraw_prompt(&mut out).unwrap();
        assert!(String::from_utf8_lossy(&out.written).contains(">> "));
        assert_eq!(out.flushed, 1);
    }
}
