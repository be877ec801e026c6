//! Wire payloads exchanged with the chat and contact endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of a chat request. The full transcript is sent on every exchange;
/// the endpoint keeps no state between requests.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// JSON pointer to the incremental text of one streamed frame.
pub const DELTA_CONTENT_POINTER: &str = "/choices/0/delta/content";

/// Extract `choices[0].delta.content` from a decoded frame.
///
/// Frames that are valid JSON but carry no text (role-only deltas, usage
/// records, finish markers) yield `None`, as do empty fragments.
pub fn delta_content(value: &Value) -> Option<&str> {
    value
        .pointer(DELTA_CONTENT_POINTER)
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
}

/// The server-supplied message of an error body: the `error` string,
/// exactly as sent.
pub fn extract_error_summary(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|error| !error.is_empty())
        .map(str::to_owned)
}

/// Message for a non-success reply: the server's `error` text when the body
/// carries one, otherwise a status-coded fallback.
pub fn error_message_for_status(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body.trim())
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub topic: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ContactResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delta_content_reads_first_choice() {
        let frame = json!({"choices": [{"delta": {"content": "Hi"}}, {"delta": {"content": "no"}}]});
        assert_eq!(delta_content(&frame), Some("Hi"));
    }

    #[test]
    fn delta_content_ignores_frames_without_text() {
        assert_eq!(delta_content(&json!({"choices": []})), None);
        assert_eq!(delta_content(&json!({"choices": [{"delta": {"role": "assistant"}}]})), None);
        assert_eq!(delta_content(&json!({"choices": [{"delta": {"content": ""}}]})), None);
        assert_eq!(delta_content(&json!(42)), None);
    }

    #[test]
    fn error_summary_reads_only_the_error_string() {
        assert_eq!(
            extract_error_summary(&json!({"error": "rate limited"})).as_deref(),
            Some("rate limited")
        );
        assert_eq!(extract_error_summary(&json!({"error": {"message": "nested"}})), None);
        assert_eq!(extract_error_summary(&json!({"message": "bad input"})), None);
        assert_eq!(extract_error_summary(&json!({"status": "failed"})), None);
        assert_eq!(extract_error_summary(&json!({"error": ""})), None);
    }

    #[test]
    fn server_error_text_is_passed_through_verbatim() {
        assert_eq!(
            error_message_for_status(429, r#"{"error":"rate  limited\n(retry in 5s)"}"#),
            "rate  limited\n(retry in 5s)"
        );
        assert_eq!(
            error_message_for_status(500, r#"{"message":"upstream said hi"}"#),
            "Request failed with status 500"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message_for_status(429, r#"{"error":"rate limited"}"#),
            "rate limited"
        );
        assert_eq!(
            error_message_for_status(502, "<html>Bad Gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(error_message_for_status(500, ""), "Request failed with status 500");
    }

    #[test]
    fn contact_response_ignores_extra_fields() {
        let reply: ContactResponse =
            serde_json::from_str(r#"{"success":true,"message":"Thanks"}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Thanks"));
        assert!(reply.error.is_none());
    }

    #[test]
    fn contact_request_uses_camel_case_keys() {
        let request = ContactRequest {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical".to_string(),
            role: "CISO".to_string(),
            topic: "Assessment".to_string(),
            message: "Hello".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert!(value.get("full_name").is_none());
    }
}
