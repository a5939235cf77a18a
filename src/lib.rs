//! # MailBreeze - a typed async client for the MailBreeze email API
//!
//! `mailbreeze` is built on top of `reqwest`. Every call goes through one
//! transport that decodes the standard response envelope, classifies
//! failures, retries transient ones with exponential backoff (honoring
//! `Retry-After`), and sends idempotency keys safely.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailbreeze::{Client, RequestOptions};
//! use mailbreeze::types::{ListEmailsParams, SendEmailParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailbreeze::Error> {
//!     let client = Client::new("sk_live_xxx")?;
//!
//!     let params = SendEmailParams {
//!         from: "hello@yourdomain.com".to_string(),
//!         to: vec!["user@example.com".to_string()],
//!         subject: Some("Welcome!".to_string()),
//!         html: Some("<h1>Welcome!</h1>".to_string()),
//!         ..Default::default()
//!     };
//!     let options = RequestOptions::new().idempotency_key("welcome-user-42");
//!     let email = client.emails().send(&params, &options).await?;
//!     println!("Email {} is {:?}", email.id, email.status);
//!
//!     let page = client.emails().list(&ListEmailsParams::default()).await?;
//!     println!("{} emails in total", page.pagination.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! API rejections arrive as [`Error::Api`]; the [`Classify`] trait answers
//! the common questions on any error value:
//!
//! ```no_run
//! use mailbreeze::{Classify, Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("sk_live_xxx")?;
//! match client.emails().get("email_123").await {
//!     Ok(email) => println!("Email: {:?}", email),
//!     Err(e) if e.is_not_found() => println!("No such email"),
//!     Err(e) if e.is_rate_limited() => {
//!         println!("Slow down for {}s", e.retry_after());
//!     }
//!     Err(Error::Api(api)) => {
//!         eprintln!("API error {} ({}): {}", api.status_code, api.code, api.message);
//!     }
//!     Err(e) => eprintln!("Transport error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries and Cancellation
//!
//! ```no_run
//! use mailbreeze::{CancellationToken, Client, Context};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), mailbreeze::Error> {
//! let client = Client::builder()
//!     .api_key("sk_live_xxx")
//!     .max_retries(5)
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! // Bound every attempt and every backoff sleep of these calls.
//! let token = CancellationToken::new();
//! let scoped = client.with_context(
//!     Context::background()
//!         .with_cancellation(token.clone())
//!         .with_timeout(Duration::from_secs(60)),
//! );
//! let stats = scoped.emails().stats().await?;
//! println!("success rate {}", stats.success_rate);
//! # Ok(())
//! # }
//! ```

mod cancel;
mod client;
pub mod envelope;
pub mod error;
mod request;
pub mod resources;
mod response;
pub mod retry;
pub mod types;

pub use cancel::{CancellationToken, Context};
pub use client::{
    Client, ClientBuilder, API_KEY_HEADER, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
    USER_AGENT_VALUE,
};
pub use envelope::REQUEST_ID_HEADER;
pub use error::{ApiError, Classify, Error, Result};
pub use request::{ApiPath, Endpoint, RequestOptions, IDEMPOTENCY_KEY_HEADER};
pub use response::Response;
pub use retry::{RetryOnRetryable, RetryPolicy, RetryPredicate};
