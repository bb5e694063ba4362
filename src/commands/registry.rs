use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "nick",
        usage: "/nick <name>",
        help: "Change your codename.",
        handler: super::handle_nick,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the terminal buffer.",
        handler: super::handle_clear,
    },
    Command {
        name: "exit",
        usage: "/exit",
        help: "Terminate the session.",
        handler: super::handle_exit,
    },
    Command {
        name: "ai",
        usage: "/ai <instruction>",
        help: "Send an instruction to the terminal AI.",
        handler: super::handle_ai,
    },
    Command {
        name: "levelup",
        usage: "/levelup",
        help: "Force a level up.",
        handler: super::handle_levelup,
    },
];
