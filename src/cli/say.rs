//! One-shot "say" command

use std::error::Error;
use std::io;

use crate::core::config::Config;
use crate::ui::renderer::TerminalRenderer;

pub async fn run_say(config: &Config, prompt: &str) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("Usage: gem-assist say <prompt>".into());
    }

    let mut session = super::open_session(config)?;
    let mut renderer = TerminalRenderer::new(io::stdout());
    if session.send(prompt, &mut renderer).await.is_err() {
        // The renderer has already reported the failure.
        std::process::exit(1);
    }
    Ok(())
}
