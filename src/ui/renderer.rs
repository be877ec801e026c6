use std::io::Write;

use crate::core::message::{Message, Role};
use crate::core::quick_actions::{ActionKind, QuickAction};
use crate::ui::Renderer;

pub const ASSISTANT_NAME: &str = "ARIA";
pub const USER_NAME: &str = "You";

pub fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => USER_NAME,
        Role::Assistant => ASSISTANT_NAME,
    }
}

/// Streams replies to a terminal (or any writer) as they arrive.
///
/// Each update carries the whole reply so far; only the part not yet on
/// screen is written. If an update is not an extension of what was shown,
/// the reply is printed again in full on a fresh line.
pub struct TerminalRenderer<W: Write> {
    out: W,
    shown: String,
    loading: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: String::new(),
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_welcome(&mut self, actions: &[QuickAction]) {
        let _ = writeln!(
            self.out,
            "{ASSISTANT_NAME}: Hello! I'm {ASSISTANT_NAME}, your GEM Enterprise AI assistant. How can I assist you today?"
        );
        self.print_actions(actions);
    }

    pub fn print_actions(&mut self, actions: &[QuickAction]) {
        let _ = writeln!(self.out, "Quick actions:");
        for action in actions {
            let detail = match action.kind {
                ActionKind::Send(text) => format!("asks \"{text}\""),
                ActionKind::Navigate(target) => format!("opens {target}"),
            };
            let _ = writeln!(self.out, "  /action {:<12} {detail}", action.label);
        }
        let _ = self.out.flush();
    }

    pub fn print_transcript(&mut self, messages: &[Message]) {
        if messages.is_empty() {
            let _ = writeln!(self.out, "(no messages yet)");
        }
        for message in messages {
            let _ = writeln!(self.out, "{}: {}", speaker(message.role), message.content);
        }
        let _ = self.out.flush();
    }

    pub fn print_prompt(&mut self) {
        let _ = write!(self.out, "{USER_NAME}: ");
        let _ = self.out.flush();
    }

    pub fn print_line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.shown.clear();
        } else if !self.shown.is_empty() {
            let _ = writeln!(self.out);
        }
        self.loading = loading;
        let _ = self.out.flush();
    }

    fn assistant_delta(&mut self, cumulative: &str) {
        if self.shown.is_empty() {
            let _ = write!(self.out, "{ASSISTANT_NAME}: {cumulative}");
        } else if let Some(unseen) = cumulative.strip_prefix(self.shown.as_str()) {
            let _ = write!(self.out, "{unseen}");
        } else {
            let _ = write!(self.out, "\n{ASSISTANT_NAME}: {cumulative}");
        }
        self.shown.clear();
        self.shown.push_str(cumulative);
        let _ = self.out.flush();
    }

    fn notify_error(&mut self, message: &str) {
        if !self.shown.is_empty() {
            let _ = writeln!(self.out);
            self.shown.clear();
        }
        let _ = writeln!(self.out, "Connection Error: {message}");
        let _ = self.out.flush();
    }
}
