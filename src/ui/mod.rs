//! Presentation layer for chat sessions.
//!
//! [`Renderer`] is the seam between [`crate::core::session`] and whatever
//! displays the conversation. [`renderer::TerminalRenderer`] is the line
//! oriented implementation used by the CLI.

pub mod renderer;

use crate::core::message::Message;

/// Display callbacks for one chat widget.
pub trait Renderer {
    /// An exchange started (`true`) or ended (`false`).
    fn set_loading(&mut self, loading: bool);

    /// Full text of the in-progress assistant message so far.
    fn assistant_delta(&mut self, cumulative: &str);

    /// The finalized transcript after an exchange. Append-only displays that
    /// already show every message can ignore this.
    fn show_transcript(&mut self, _messages: &[Message]) {}

    /// Non-blocking notice for a failed exchange.
    fn notify_error(&mut self, message: &str);
}
