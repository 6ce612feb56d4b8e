//! Output formatting utilities

use colored::*;
use kdeploy_resources::{DebugLogs, RolloutState};

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

pub fn colorize_state(state: RolloutState) -> ColoredString {
    let label = state.to_string();
    match state {
        RolloutState::Succeeded => label.green(),
        RolloutState::Failed | RolloutState::NotFound => label.red(),
        RolloutState::Progressing => label.yellow(),
        RolloutState::Unknown => label.dimmed(),
    }
}

/// Indented block under a header, one line per message line
pub fn print_message_block(header: &str, message: &str) {
    println!("{}", header.bold());
    for line in message.lines() {
        println!("  {}", line);
    }
}

pub fn print_debug_logs(logs: &DebugLogs) {
    print!("{}", logs.to_string().dimmed());
}
