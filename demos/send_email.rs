//! Sends a transactional email and reads it back.
//!
//! Run with: `MAILBREEZE_API_KEY=sk_... cargo run --example send_email`

use mailbreeze::types::{ListEmailsParams, SendEmailParams};
use mailbreeze::{Client, Error, RequestOptions};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("mailbreeze=debug,send_email=info")
        .init();

    let api_key = std::env::var("MAILBREEZE_API_KEY").unwrap_or_default();
    let client = Client::new(api_key)?;

    let params = SendEmailParams {
        from: "hello@yourdomain.com".to_string(),
        to: vec!["user@example.com".to_string()],
        subject: Some("Welcome!".to_string()),
        html: Some("<h1>Welcome aboard</h1>".to_string()),
        tags: vec!["onboarding".to_string()],
        ..Default::default()
    };

    // Same key on every run: the API delivers this email at most once.
    let options = RequestOptions::new().idempotency_key("welcome-user-42");
    let email = client.emails().send(&params, &options).await?;
    println!("Queued {} ({:?})", email.id, email.status);

    let fetched = client.emails().get(&email.id).await?;
    println!("Status now: {:?}", fetched.status);

    let recent = client
        .emails()
        .list(&ListEmailsParams {
            limit: Some(5),
            ..Default::default()
        })
        .await?;
    for email in recent.data {
        println!("{} -> {:?}: {:?}", email.id, email.to, email.status);
    }

    let stats = client.emails().stats().await?;
    println!("Success rate: {:.1}%", stats.success_rate);

    Ok(())
}
