//! Canned quick actions offered when a conversation starts.

pub const CONTACT_PATH: &str = "/contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Send the text as if the user had typed it.
    Send(&'static str),
    /// Leave the chat for a site page; no message is sent.
    Navigate(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub kind: ActionKind,
}

const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        label: "Services",
        kind: ActionKind::Send("Tell me about your security services."),
    },
    QuickAction {
        label: "Recovery",
        kind: ActionKind::Send("How does asset recovery work?"),
    },
    QuickAction {
        label: "Pricing",
        kind: ActionKind::Send("What are your pricing plans?"),
    },
    QuickAction {
        label: "Live Agent",
        kind: ActionKind::Navigate(CONTACT_PATH),
    },
];

pub fn all_actions() -> &'static [QuickAction] {
    QUICK_ACTIONS
}

pub fn find_action(label: &str) -> Option<&'static QuickAction> {
    let label = label.trim();
    all_actions()
        .iter()
        .find(|action| action.label.eq_ignore_ascii_case(label))
}

pub fn dispatch(label: &str) -> Option<ActionKind> {
    find_action(label).map(|action| action.kind)
}
