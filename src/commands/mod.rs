//! Slash commands understood by the interactive chat.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    ProcessAsMessage(String),
    ShowHelp,
    ListActions,
    RunAction(String),
    ShowHistory,
    Clear,
    Quit,
    /// The command was recognized but its arguments were not.
    Usage(&'static str),
}

/// Route one line of REPL input.
///
/// Lines that do not start with a known `/command` are chat messages.
pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => (command.handler)(CommandInvocation { args }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("Commands:");
    for command in all_commands() {
        text.push_str(&format!(
            "\n  {:<width$}  {}",
            command.usage,
            command.help,
            width = width
        ));
    }
    text.push_str("\nAnything else is sent to the assistant.");
    text
}

fn handle_help(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ShowHelp
}

fn handle_actions(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ListActions
}

fn handle_action(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Usage("Usage: /action <label>");
    }
    CommandResult::RunAction(invocation.args.to_string())
}

fn handle_history(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ShowHistory
}

fn handle_clear(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Clear
}

fn handle_quit(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
