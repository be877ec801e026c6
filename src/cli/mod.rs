//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches to the chat
//! loop, the one-shot commands, and the config editor.

mod chat;
mod contact;
mod say;

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::core::chat_stream::{HttpTransport, StreamingChatConsumer};
use crate::core::config::data::path_display;
use crate::core::config::{Config, ConfigKey};
use crate::core::quick_actions::all_actions;
use crate::core::session::ChatSession;
use crate::ui::renderer::TerminalRenderer;

pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "gem-assist", version = VERSION)]
#[command(about = "Terminal client for the GEM Enterprise assistant")]
#[command(
    long_about = "gem-assist talks to the GEM Enterprise assistant from a terminal. Replies \
stream in as they are generated.\n\n\
Configuration:\n\
  Run 'gem-assist set base-url <url>' and 'gem-assist set auth-token <key>' once.\n\n\
Environment Variables (override the config file):\n\
  GEM_ASSIST_BASE_URL   Root URL of the hosted functions project\n\
  GEM_ASSIST_TOKEN      Publishable key sent as a bearer token\n\
  GEM_ASSIST_SITE_URL   Site used to resolve links such as /contact\n\
  RUST_LOG              Diagnostic log filter (written to stderr)\n\n\
Chat commands:\n\
  /help             List commands\n\
  /action <label>   Run a quick action\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Send one message and print the streamed reply
    Say {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the quick actions
    Actions,
    /// Send the contact form
    Contact(ContactArgs),
    /// Set a configuration value
    Set {
        /// Configuration key, e.g. base-url
        key: String,
        /// Value to store; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ContactArgs {
    /// Your full name
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub company: String,
    /// Your role at the company
    #[arg(long)]
    pub role: String,
    /// What the enquiry is about
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub message: String,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args));
    // Don't wait on blocking tasks that may still be parked on a read.
    runtime.shutdown_background();
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    debug!(path = %path_display(&config_path), "Using config file");

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load_with_env(&config_path)?;
            chat::run_chat(&config).await
        }
        Commands::Say { prompt } => {
            let config = Config::load_with_env(&config_path)?;
            say::run_say(&config, &prompt.join(" ")).await
        }
        Commands::Actions => {
            TerminalRenderer::new(io::stdout()).print_actions(all_actions());
            Ok(())
        }
        Commands::Contact(form) => {
            let config = Config::load_with_env(&config_path)?;
            contact::run_contact(&config, form).await
        }
        Commands::Set { key, value } => set_config_value(&config_path, &key, &value.join(" ")),
        Commands::Unset { key } => unset_config_value(&config_path, &key),
        Commands::Config => {
            let config = Config::load_with_env(&config_path)?;
            println!("Config file: {}", path_display(&config_path));
            config.print_all();
            Ok(())
        }
    }
}

fn set_config_value(config_path: &Path, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let key = ConfigKey::parse(key)?;
    let mut config = Config::load_from_path(config_path)?;
    config.set_value(key, value)?;
    config.save_to_path(config_path)?;
    println!("Set {} in {}", key.name(), path_display(config_path));
    Ok(())
}

fn unset_config_value(config_path: &Path, key: &str) -> Result<(), Box<dyn Error>> {
    let key = ConfigKey::parse(key)?;
    let mut config = Config::load_from_path(config_path)?;
    config.unset_value(key);
    config.save_to_path(config_path)?;
    println!("Unset {}", key.name());
    Ok(())
}

/// Build a chat session against the configured endpoint.
fn open_session(config: &Config) -> Result<ChatSession<HttpTransport>, Box<dyn Error>> {
    let transport = HttpTransport::new(
        config.chat_url()?,
        config.auth_token(),
        config.request_timeout(),
    )?;
    debug!(endpoint = transport.endpoint(), "Using chat endpoint");
    let consumer =
        StreamingChatConsumer::new(transport).with_trailing_frames(config.trailing_frames());
    Ok(ChatSession::new(consumer))
}
