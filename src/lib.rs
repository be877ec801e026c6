//! gem-assist is a terminal client for the GEM Enterprise assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the streaming chat consumer, the SSE decoder, the
//!   conversation model, quick actions, contact submission, and config.
//! - [`ui`] defines the [`ui::Renderer`] seam and a terminal renderer.
//! - [`commands`] parses slash commands for the interactive chat.
//! - [`api`] defines the wire payloads and error-body parsing.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
