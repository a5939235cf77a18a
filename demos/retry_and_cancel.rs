//! Retry tuning, error classification and cancellation.
//!
//! Run with: `MAILBREEZE_API_KEY=sk_... cargo run --example retry_and_cancel`

use mailbreeze::types::VerifyEmailParams;
use mailbreeze::{CancellationToken, Classify, Client, Context, Error, RetryPolicy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("mailbreeze=debug,retry_and_cancel=info")
        .init();

    let api_key = std::env::var("MAILBREEZE_API_KEY").unwrap_or_default();
    let client = Client::builder()
        .api_key(api_key)
        .timeout(Duration::from_secs(10))
        .retry_policy(RetryPolicy {
            max_retries: 5,
            initial_delay: Duration::from_millis(500),
        })
        .build()?;

    let token = CancellationToken::new();
    let scoped = client.with_context(
        Context::background()
            .with_cancellation(token.clone())
            .with_timeout(Duration::from_secs(30)),
    );

    // Ctrl-C stops the call, including any backoff sleep in progress.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let params = VerifyEmailParams {
        email: "user@example.com".to_string(),
    };
    match scoped.verification().verify(&params).await {
        Ok(result) => println!("{} is {:?}", result.email, result.result),
        Err(e) if e.is_authentication() => eprintln!("Check MAILBREEZE_API_KEY"),
        Err(e) if e.is_rate_limited() => eprintln!("Rate limited, retry in {}s", e.retry_after()),
        Err(e) if e.is_cancellation() => eprintln!("Stopped: {}", e),
        Err(e) => return Err(e),
    }

    Ok(())
}
