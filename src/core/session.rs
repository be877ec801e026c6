//! Chat widget controller: owns the transcript and runs one exchange at a
//! time through the streaming consumer.

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::chat_stream::{ChatStreamError, StreamObserver, StreamingChatConsumer, Transport};
use crate::core::message::Conversation;
use crate::core::quick_actions::{dispatch, ActionKind};
use crate::ui::Renderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action sent a canned message; carries the reply text.
    Replied(String),
    /// The action asks the host to navigate to a page.
    Navigate(&'static str),
    Unknown,
}

/// Mirrors deltas into the transcript and forwards them to the renderer.
struct TranscriptObserver<'a> {
    conversation: &'a mut Conversation,
    renderer: &'a mut dyn Renderer,
}

impl StreamObserver for TranscriptObserver<'_> {
    fn on_delta(&mut self, cumulative: &str) {
        self.conversation.upsert_assistant(cumulative);
        self.renderer.assistant_delta(cumulative);
    }
}

pub struct ChatSession<T> {
    consumer: StreamingChatConsumer<T>,
    conversation: Conversation,
}

impl<T: Transport> ChatSession<T> {
    pub fn new(consumer: StreamingChatConsumer<T>) -> Self {
        Self {
            consumer,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Forget the conversation, as a page reload would.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    pub fn cancel_handle(&self) -> CancellationToken {
        self.consumer.cancel_handle()
    }

    /// Send `text` with the whole transcript and stream the reply.
    ///
    /// Blank input sends nothing and returns `Ok(None)`. On failure the
    /// user message is taken back out of the transcript, partial reply text
    /// stays, and the renderer is told about the error.
    pub async fn send(
        &mut self,
        text: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Option<String>, ChatStreamError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let user_index = self.conversation.push_user(text);
        let history = self.conversation.to_api_messages();
        renderer.set_loading(true);

        let result = {
            let mut observer = TranscriptObserver {
                conversation: &mut self.conversation,
                renderer: &mut *renderer,
            };
            self.consumer.send(&history, &mut observer).await
        };

        self.conversation.seal();
        if let Err(err) = &result {
            warn!(error = %err, "Chat exchange failed");
            self.conversation.remove_at(user_index);
            renderer.notify_error(err.message());
        }

        renderer.show_transcript(self.conversation.messages());
        renderer.set_loading(false);
        result.map(Some)
    }

    /// Run a quick action by label.
    pub async fn run_action(
        &mut self,
        label: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<ActionOutcome, ChatStreamError> {
        match dispatch(label) {
            Some(ActionKind::Send(text)) => {
                let reply = self.send(text, renderer).await?;
                Ok(ActionOutcome::Replied(reply.unwrap_or_default()))
            }
            Some(ActionKind::Navigate(target)) => Ok(ActionOutcome::Navigate(target)),
            None => Ok(ActionOutcome::Unknown),
        }
    }
}
