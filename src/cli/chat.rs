//! Interactive chat loop

use std::error::Error;
use std::io::{self, BufRead, BufReader};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::commands::{help_text, process_input, CommandResult};
use crate::core::chat_stream::ChatStreamError;
use crate::core::config::Config;
use crate::core::quick_actions::all_actions;
use crate::core::session::ActionOutcome;
use crate::ui::renderer::TerminalRenderer;

pub async fn run_chat(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut session = super::open_session(config)?;
    let mut renderer = TerminalRenderer::new(io::stdout());
    renderer.print_welcome(all_actions());
    renderer.print_line("Type /help for commands.");

    // Ctrl+C tears the session down, aborting a reply that is streaming.
    let shutdown = session.cancel_handle();
    let interrupt = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        })
    };

    let mut lines = spawn_line_reader(BufReader::new(io::stdin()));
    loop {
        renderer.print_prompt();
        let Some(line) = next_line(&mut lines, &shutdown).await? else {
            break;
        };

        let outcome = match process_input(&line) {
            CommandResult::ProcessAsMessage(text) => {
                session.send(&text, &mut renderer).await.map(drop)
            }
            CommandResult::RunAction(label) => {
                match session.run_action(&label, &mut renderer).await {
                    Ok(ActionOutcome::Navigate(target)) => {
                        renderer.print_line(&format!("Opening {}", config.navigation_url(target)));
                        renderer.print_line("Use `gem-assist contact` to reach the team from here.");
                        Ok(())
                    }
                    Ok(ActionOutcome::Unknown) => {
                        renderer.print_line(&format!("Unknown quick action: {label}"));
                        Ok(())
                    }
                    Ok(ActionOutcome::Replied(_)) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            CommandResult::ShowHelp => {
                renderer.print_line(&help_text());
                Ok(())
            }
            CommandResult::ListActions => {
                renderer.print_actions(all_actions());
                Ok(())
            }
            CommandResult::ShowHistory => {
                renderer.print_transcript(session.conversation().messages());
                Ok(())
            }
            CommandResult::Clear => {
                session.clear();
                renderer.print_line("Conversation cleared.");
                Ok(())
            }
            CommandResult::Usage(usage) => {
                renderer.print_line(usage);
                Ok(())
            }
            CommandResult::Quit => break,
        };

        // Other failures were already shown and the loop carries on.
        if outcome == Err(ChatStreamError::Cancelled) {
            break;
        }
    }

    interrupt.abort();
    Ok(())
}

/// Read lines on a plain thread so a read blocked at the prompt never holds
/// up runtime shutdown.
fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in reader.lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Next input line, or `None` at end of input or once `shutdown` fires.
async fn next_line(
    lines: &mut mpsc::Receiver<io::Result<String>>,
    shutdown: &CancellationToken,
) -> io::Result<Option<String>> {
    tokio::select! {
        line = lines.recv() => line.transpose(),
        _ = shutdown.cancelled() => Ok(None),
    }
}
