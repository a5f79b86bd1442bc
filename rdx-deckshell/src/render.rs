//! Terminal rendering of the deck, the history and alert notices.

use chrono_tz::Tz;
use colored::{ColoredString, Colorize};
use timerdeck::history::{category_names, filter_logs, format_clock, format_timestamp};
use timerdeck::prelude::*;

/// Timer ids in the order `print_deck` numbers them: by category, then
/// timers whose category no longer exists.
pub fn timer_handles(state: &TimerState) -> Vec<TimerId> {
    let mut handles: Vec<TimerId> = state
        .categories
        .iter()
        .flat_map(|category| state.timers_in(&category.id).map(|t| t.id.clone()))
        .collect();
    handles.extend(
        state
            .timers
            .iter()
            .filter(|t| state.category(&t.category_id).is_none())
            .map(|t| t.id.clone()),
    );
    handles
}

pub fn print_deck(state: &TimerState) {
    if state.categories.is_empty() {
        println!("No categories yet. Use 'add category <NAME>' to create one.");
        return;
    }
    let mut handle = 0;
    for (index, category) in state.categories.iter().enumerate() {
        let timers: Vec<&Timer> = state.timers_in(&category.id).collect();
        let marker = if category.expanded { "▼" } else { "►" };
        println!(
            "{} {} {}",
            format!("[{}]", index + 1).dimmed(),
            category.name.bold(),
            marker.dimmed()
        );
        for timer in &timers {
            handle += 1;
            if category.expanded {
                print_timer(handle, timer);
            }
        }
        if category.expanded && timers.is_empty() {
            println!("      {}", "no timers".dimmed());
        }
    }

    let orphans: Vec<&Timer> = state
        .timers
        .iter()
        .filter(|t| state.category(&t.category_id).is_none())
        .collect();
    if !orphans.is_empty() {
        println!("{}", "(no category)".bold());
        for timer in orphans {
            handle += 1;
            print_timer(handle, timer);
        }
    }
}

fn print_timer(handle: usize, timer: &Timer) {
    let alert = if timer.halfway_alert { "½" } else { " " };
    println!(
        "  {:>3}. {:<24} {} / {}  {:>5.1}%  {} {}",
        handle,
        timer.name,
        format_clock(timer.remaining_time).bold(),
        format_clock(timer.duration),
        timer.progress(),
        status_label(timer.status),
        alert.yellow()
    );
}

fn status_label(status: TimerStatus) -> ColoredString {
    match status {
        TimerStatus::Running => "Running  ".green(),
        TimerStatus::Paused => "Paused   ".yellow(),
        TimerStatus::Completed => "Completed".blue(),
    }
}

pub fn print_history(logs: &[TimerLog], category: Option<&str>, tz: Tz) {
    let names = category_names(logs);
    if !names.is_empty() {
        println!("{} All, {}", "Categories:".dimmed(), names.join(", "));
    }
    let selected = filter_logs(logs, category);
    if selected.is_empty() {
        println!("No timer history yet");
        return;
    }
    for log in selected {
        println!(
            "  {}  {:<12} {:<24} {}",
            format_timestamp(log.completed_at, tz).dimmed(),
            log.category_name,
            log.timer_name,
            format_clock(log.duration)
        );
    }
}

/// Prints an alert box. The prompt that follows serves as the acknowledgement.
pub fn print_notice(title: &str, message: &str) {
    let width = title.chars().count().max(message.chars().count()) + 4;
    let rule = "─".repeat(width);
    println!();
    println!("{}", format!("┌{}┐", rule).cyan());
    println!("{}  {:<w$}  {}", "│".cyan(), title.bold(), "│".cyan(), w = width - 4);
    println!("{}  {:<w$}  {}", "│".cyan(), message, "│".cyan(), w = width - 4);
    println!("{}", format!("└{}┘", rule).cyan());
}
