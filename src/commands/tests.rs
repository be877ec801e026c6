use super::*;

#[test]
fn plain_text_is_a_message() {
    assert_eq!(
        process_input("What do you offer?"),
        CommandResult::ProcessAsMessage("What do you offer?".to_string())
    );
}

#[test]
fn unknown_command_is_sent_as_message() {
    assert_eq!(
        process_input("/pricing please"),
        CommandResult::ProcessAsMessage("/pricing please".to_string())
    );
    assert_eq!(
        process_input("/"),
        CommandResult::ProcessAsMessage("/".to_string())
    );
}

#[test]
fn command_names_are_case_insensitive() {
    assert_eq!(process_input("  /HELP "), CommandResult::ShowHelp);
    assert_eq!(process_input("/Quit"), CommandResult::Quit);
    assert_eq!(process_input("/clear"), CommandResult::Clear);
    assert_eq!(process_input("/actions"), CommandResult::ListActions);
    assert_eq!(process_input("/history"), CommandResult::ShowHistory);
}

#[test]
fn action_takes_the_rest_of_the_line() {
    assert_eq!(
        process_input("/action   Live Agent  "),
        CommandResult::RunAction("Live Agent".to_string())
    );
}

#[test]
fn action_without_label_reports_usage() {
    assert_eq!(
        process_input("/action"),
        CommandResult::Usage("Usage: /action <label>")
    );
}

#[test]
fn help_lists_every_command() {
    let help = help_text();
    for command in all_commands() {
        assert!(help.contains(command.usage), "{help}");
        assert!(help.contains(command.help), "{help}");
    }
}

#[test]
fn registry_lookup() {
    assert!(find_command("ACTION").is_some());
    assert!(find_command("theme").is_none());
}
