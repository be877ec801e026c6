//! Contact form submission.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use tracing::info;

use crate::api::{error_message_for_status, ContactRequest, ContactResponse};
use crate::utils::auth::add_auth_headers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The submission failed local validation and was not sent.
    Invalid(String),
    /// The request could not be delivered.
    Transport(String),
    /// The endpoint answered but refused the submission.
    Rejected(String),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactError::Invalid(message)
            | ContactError::Transport(message)
            | ContactError::Rejected(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ContactError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub topic: String,
    pub message: String,
}

/// Loggable view of a submission; the message body is reduced to its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub topic: String,
    pub message_length: usize,
    pub timestamp: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ContactError> {
        let fields = [
            &self.full_name,
            &self.email,
            &self.company,
            &self.role,
            &self.topic,
            &self.message,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ContactError::Invalid("All fields are required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(ContactError::Invalid("Invalid email format".to_string()));
        }
        Ok(())
    }

    pub fn summary(&self) -> ContactSummary {
        ContactSummary {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            role: self.role.clone(),
            topic: self.topic.clone(),
            message_length: self.message.chars().count(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn to_request(&self) -> ContactRequest {
        ContactRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            role: self.role.clone(),
            topic: self.topic.clone(),
            message: self.message.clone(),
        }
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub struct ContactClient {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl ContactClient {
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ContactError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ContactError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_token,
        })
    }

    /// Validate, log and deliver a submission. Returns the endpoint's
    /// acknowledgement text.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<String, ContactError> {
        submission.validate()?;

        let summary = submission.summary();
        info!(
            full_name = %summary.full_name,
            email = %summary.email,
            company = %summary.company,
            role = %summary.role,
            topic = %summary.topic,
            message_length = summary.message_length,
            timestamp = %summary.timestamp,
            "Submitting contact form"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");
        let response = add_auth_headers(request, self.auth_token.as_deref())
            .json(&submission.to_request())
            .send()
            .await
            .map_err(|err| ContactError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ContactError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(ContactError::Rejected(error_message_for_status(
                status.as_u16(),
                &body,
            )));
        }

        let reply: ContactResponse = serde_json::from_str(&body).unwrap_or_default();
        if let Some(error) = reply.error {
            return Err(ContactError::Rejected(error));
        }
        Ok(reply
            .message
            .unwrap_or_else(|| "Contact form received successfully".to_string()))
    }
}
