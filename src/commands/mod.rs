//! Slash-command parsing and execution.
//!
//! Input lines beginning with `/` are matched case-insensitively against a
//! fixed command table; anything unrecognized produces a single "unknown
//! command" line and takes no other action. Plain text is handed back to
//! the caller for the outbound message path.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::App;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        // A bare "/" names no command; it never goes out on the topic.
        _ => {
            app.add_system_line("UNKNOWN COMMAND: /");
            return CommandResult::Continue;
        }
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        app.add_system_line(format!("UNKNOWN COMMAND: /{command_name}"));
        CommandResult::Continue
    }
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.add_system_line("AVAILABLE COMMANDS:");
    for command in all_commands() {
        app.add_system_line(format!("  {:<18} - {}", command.usage, command.help));
    }
    CommandResult::Continue
}

pub(super) fn handle_nick(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let name = invocation.args.split_whitespace().next().unwrap_or("");
    if name.is_empty() {
        app.add_error_line("ERROR: NEW NAME REQUIRED");
        return CommandResult::Continue;
    }
    let old = app.session.set_nickname(name);
    let new = app.session.nickname.clone();
    app.add_system_line(format!("IDENTITY UPDATED: {old} -> {new}"));
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.clear_transcript();
    app.add_system_line("TERMINAL BUFFER CLEARED.");
    CommandResult::Continue
}

pub(super) fn handle_exit(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    // Hard reset: the chat loop disconnects the transport and cancels all
    // pending timers once it sees the flag.
    app.add_system_line("SESSION TERMINATED.");
    app.exit_requested = true;
    CommandResult::Continue
}

pub(super) fn handle_ai(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let instruction = invocation
        .args
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if instruction.is_empty() {
        app.add_error_line("ERROR: INSTRUCTION REQUIRED");
        return CommandResult::Continue;
    }
    app.handle_ai_instruction(&instruction);
    CommandResult::Continue
}

pub(super) fn handle_levelup(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let level = app.session.force_level_up();
    app.add_system_line(format!("LEVEL OVERRIDE ACCEPTED. YOU ARE NOW LEVEL {level}."));
    CommandResult::Continue
}
