use super::CommandResult;

pub type CommandHandler = fn(CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
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
        name: "actions",
        usage: "/actions",
        help: "List the quick actions.",
        handler: super::handle_actions,
    },
    Command {
        name: "action",
        usage: "/action <label>",
        help: "Run a quick action by its label.",
        handler: super::handle_action,
    },
    Command {
        name: "history",
        usage: "/history",
        help: "Print the conversation so far.",
        handler: super::handle_history,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Start a fresh conversation.",
        handler: super::handle_clear,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
