pub mod chat_stream;
pub mod config;
pub mod contact;
pub mod message;
pub mod quick_actions;
pub mod session;
pub mod sse;
