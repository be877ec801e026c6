use std::error::Error;

use super::ContactArgs;
use crate::core::config::Config;
use crate::core::contact::{ContactClient, ContactSubmission};

pub async fn run_contact(config: &Config, args: ContactArgs) -> Result<(), Box<dyn Error>> {
    let submission = ContactSubmission {
        full_name: args.name,
        email: args.email,
        company: args.company,
        role: args.role,
        topic: args.topic,
        message: args.message,
    };
    submission.validate()?;

    let client = ContactClient::new(
        config.contact_url()?,
        config.auth_token(),
        config.request_timeout(),
    )?;
    let acknowledgement = client.submit(&submission).await?;
    println!("{acknowledgement}");
    Ok(())
}
