use std::fmt::Write as _;

use crate::core::config::data::{Config, DEFAULT_CHAT_PATH, DEFAULT_CONTACT_PATH};

fn or_unset(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}

impl Config {
    /// Human-readable listing of every setting. The auth token is never
    /// echoed.
    pub fn describe(&self) -> String {
        let mut out = String::from("Current configuration:\n");
        let _ = writeln!(out, "  base-url: {}", or_unset(self.base_url.as_deref()));
        let _ = writeln!(
            out,
            "  chat-path: {}",
            self.chat_path.as_deref().unwrap_or(DEFAULT_CHAT_PATH)
        );
        let _ = writeln!(
            out,
            "  contact-path: {}",
            self.contact_path.as_deref().unwrap_or(DEFAULT_CONTACT_PATH)
        );
        let _ = writeln!(out, "  site-url: {}", or_unset(self.site_url.as_deref()));
        let token = if self.auth_token().is_some() { "(set)" } else { "(unset)" };
        let _ = writeln!(out, "  auth-token: {token}");
        match self.request_timeout() {
            Some(timeout) => {
                let _ = writeln!(out, "  request-timeout: {}s", timeout.as_secs());
            }
            None => {
                let _ = writeln!(out, "  request-timeout: none");
            }
        }
        let _ = writeln!(out, "  trailing-frames: {}", self.trailing_frames().as_str());
        out
    }

    pub fn print_all(&self) {
        print!("{}", self.describe());
    }
}
