//! Response wrapper that keeps the decoded payload next to the HTTP details.

use crate::{envelope::REQUEST_ID_HEADER, Error, Result};
use http::{HeaderMap, StatusCode};
use serde_json::value::RawValue;
use std::time::Duration;

/// A successful API response.
///
/// `data` is `None` when the exchange succeeded without a payload: a
/// `204 No Content`, an envelope without `data`, or a success status whose
/// body was not an envelope at all.
///
/// # Examples
///
/// ```no_run
/// use mailbreeze::Client;
/// use serde_json::Value;
///
/// # async fn example() -> Result<(), mailbreeze::Error> {
/// let client = Client::new("sk_live_xxx")?;
/// let response = client.get::<Value>("/emails/stats", Vec::new()).await?;
///
/// println!("status {} after {} attempt(s)", response.status, response.attempts);
/// if let Some(id) = response.request_id() {
///     println!("request id {}", id);
/// }
/// let stats = response.into_data()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded `data` payload, if there was one.
    pub data: Option<T>,

    /// The envelope's undecoded `meta` payload, if any.
    pub meta: Option<Box<RawValue>>,

    /// The HTTP status code of the final attempt.
    pub status: StatusCode,

    /// The response headers of the final attempt.
    pub headers: HeaderMap,

    /// Time from the first attempt until the final response, retries included.
    pub latency: Duration,

    /// The number of attempts made. `1` when no retry was needed.
    pub attempts: u32,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: Option<T>,
        meta: Option<Box<RawValue>>,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: u32,
    ) -> Self {
        Self {
            data,
            meta,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the payload, preserving the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mailbreeze::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(Some(42), None, StatusCode::OK, HeaderMap::new(), Duration::ZERO, 1);
    /// let response = response.map(|n| n.to_string());
    /// assert_eq!(response.data.as_deref(), Some("42"));
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: self.data.map(f),
            meta: self.meta,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns the payload, or [`Error::MissingData`] if there was none.
    pub fn into_data(self) -> Result<T> {
        let status = self.status;
        self.data.ok_or(Error::MissingData { status })
    }

    /// Returns `true` if the call needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns the server's request id for this exchange.
    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }
}
