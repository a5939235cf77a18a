//! Error types for MailBreeze API calls.
//!
//! Two kinds of failure reach callers. An [`ApiError`] is a well-formed
//! rejection from the remote service and always carries a status code, a
//! machine-readable code and a message. Everything else (connection
//! failures, cancellation, malformed payloads on the success path,
//! unserializable request bodies) is a transport-level [`Error`] variant.
//!
//! The [`Classify`] trait lets callers branch on the error category without
//! matching on internals. Every implementation is total: anything that is
//! not an API error, including the absence of an error, classifies as
//! `false` with a retry-after of `0`.

use http::StatusCode;
use serde_json::{Map, Value};
use std::fmt;

/// A structured rejection returned by the MailBreeze API.
///
/// Built by the response decoder and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use mailbreeze::ApiError;
///
/// let err = ApiError::from_status(404, "Email not found", "", Some("req_1".into()), 0);
/// assert_eq!(err.code, "NOT_FOUND");
/// assert_eq!(
///     err.to_string(),
///     "mailbreeze: Email not found (code: NOT_FOUND, status: 404, request_id: req_1)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// The HTTP status code. Forced to 400 when the server reported failure
    /// in the envelope alongside a non-error status.
    pub status_code: u16,

    /// The machine-readable error code, e.g. `VALIDATION_ERROR`.
    pub code: String,

    /// The human-readable error message.
    pub message: String,

    /// The `X-Request-Id` of the failed exchange, if the server sent one.
    pub request_id: Option<String>,

    /// Seconds to wait before retrying. `0` means no usable hint.
    pub retry_after: u64,

    /// Structured details from the error object. Empty when absent.
    pub details: Map<String, Value>,
}

impl ApiError {
    /// Creates an error from fully specified parts.
    pub fn new(
        status_code: u16,
        message: impl Into<String>,
        code: impl Into<String>,
        request_id: Option<String>,
        retry_after: u64,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
            request_id,
            retry_after,
            details,
        }
    }

    /// Creates an error from an HTTP status, deriving the code from the
    /// status when `code` is empty.
    pub fn from_status(
        status_code: u16,
        message: impl Into<String>,
        code: impl Into<String>,
        request_id: Option<String>,
        retry_after: u64,
    ) -> Self {
        let mut code = code.into();
        if code.is_empty() {
            code = code_from_status(status_code).to_string();
        }
        Self::new(status_code, message, code, request_id, retry_after, Map::new())
    }

    /// Returns the status as an [`http::StatusCode`], if it is a valid one.
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request_id {
            Some(request_id) => write!(
                f,
                "mailbreeze: {} (code: {}, status: {}, request_id: {})",
                self.message, self.code, self.status_code, request_id
            ),
            None => write!(
                f,
                "mailbreeze: {} (code: {}, status: {})",
                self.message, self.code, self.status_code
            ),
        }
    }
}

impl std::error::Error for ApiError {}

/// Returns the default machine code for an HTTP status.
///
/// Used whenever the server does not supply its own code.
///
/// # Examples
///
/// ```
/// use mailbreeze::error::code_from_status;
///
/// assert_eq!(code_from_status(429), "RATE_LIMIT_EXCEEDED");
/// assert_eq!(code_from_status(503), "SERVER_ERROR");
/// assert_eq!(code_from_status(418), "UNKNOWN_ERROR");
/// ```
pub fn code_from_status(status_code: u16) -> &'static str {
    match status_code {
        400 => "VALIDATION_ERROR",
        401 => "AUTHENTICATION_ERROR",
        403 => "FORBIDDEN",
        404 => "NOT_FOUND",
        429 => "RATE_LIMIT_EXCEEDED",
        s if s >= 500 => "SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

/// The main error type for MailBreeze calls.
///
/// # Examples
///
/// ```no_run
/// use mailbreeze::{Classify, Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("sk_live_xxx")?;
///
/// match client.emails().get("email_123").await {
///     Ok(email) => println!("status: {:?}", email.status),
///     Err(e) if e.is_not_found() => eprintln!("no such email"),
///     Err(Error::Api(api)) => eprintln!("rejected: {} ({})", api.message, api.code),
///     Err(e) => eprintln!("transport failure: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API rejected the call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A network-level error occurred (connection refused, DNS failure, etc.).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured per-request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The call's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The call's deadline passed.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The `data` field of a successful envelope did not match the expected type.
    ///
    /// Preserves the raw payload so the mismatch can be debugged.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw `data` payload that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A successful response carried no payload where one was required.
    #[error("Response (status {status}) carried no data")]
    MissingData {
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the request body. No request was sent.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided or assembled.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_builder() {
            Error::ConfigurationError(err.to_string())
        } else {
            Error::Network(err)
        }
    }
}

impl Error {
    /// Returns `true` if this error is worth another attempt.
    ///
    /// Network errors, timeouts, and API errors with status 429 or >= 500
    /// are retryable. Cancellation, decoding, and configuration failures
    /// are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailbreeze::{ApiError, Error};
    ///
    /// let err = Error::Api(ApiError::from_status(503, "Unavailable", "", None, 0));
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::Api(ApiError::from_status(400, "Bad email", "", None, 0));
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Timeout => true,
            Error::Api(api) => api.status_code == 429 || api.status_code >= 500,
            Error::Cancelled => false,
            Error::DeadlineExceeded => false,
            Error::DeserializationFailed { .. } => false,
            Error::MissingData { .. } => false,
            Error::SerializationFailed(_) => false,
            Error::ConfigurationError(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns `true` if the call was stopped by its context.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(api) => api.status(),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::MissingData { status } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized `Result` type for MailBreeze calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Category predicates over anything that may hold an [`ApiError`].
///
/// All predicates look only at the status code. They never panic and
/// answer `false` for transport errors and for `None`.
///
/// # Examples
///
/// ```
/// use mailbreeze::{ApiError, Classify, Error};
///
/// let err = Error::Api(ApiError::from_status(429, "Slow down", "", None, 30));
/// assert!(err.is_rate_limited());
/// assert_eq!(err.retry_after(), 30);
///
/// let none: Option<&Error> = None;
/// assert!(!none.is_rate_limited());
/// assert_eq!(none.retry_after(), 0);
///
/// assert!(!Error::Timeout.is_server_error());
/// ```
pub trait Classify {
    /// Returns the API error, if this value holds one.
    fn api_error(&self) -> Option<&ApiError>;

    /// 401 Unauthorized.
    fn is_authentication(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code == 401)
    }

    /// 400 Bad Request.
    fn is_validation(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code == 400)
    }

    /// 404 Not Found.
    fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code == 404)
    }

    /// 429 Too Many Requests.
    fn is_rate_limited(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code == 429)
    }

    /// Any 5xx status.
    fn is_server_error(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code >= 500)
    }

    /// The server's retry-after hint in seconds, or `0`.
    fn retry_after(&self) -> u64 {
        self.api_error().map_or(0, |e| e.retry_after)
    }
}

impl Classify for ApiError {
    fn api_error(&self) -> Option<&ApiError> {
        Some(self)
    }
}

impl Classify for Error {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }
}

impl<T: Classify + ?Sized> Classify for &T {
    fn api_error(&self) -> Option<&ApiError> {
        (**self).api_error()
    }
}

impl<T: Classify> Classify for Option<T> {
    fn api_error(&self) -> Option<&ApiError> {
        self.as_ref().and_then(Classify::api_error)
    }
}

impl<T> Classify for std::result::Result<T, Error> {
    fn api_error(&self) -> Option<&ApiError> {
        self.as_ref().err().and_then(Classify::api_error)
    }
}

impl Classify for dyn std::error::Error + 'static {
    fn api_error(&self) -> Option<&ApiError> {
        if let Some(err) = self.downcast_ref::<Error>() {
            return err.api_error();
        }
        self.downcast_ref::<ApiError>()
    }
}

impl Classify for dyn std::error::Error + Send + Sync + 'static {
    fn api_error(&self) -> Option<&ApiError> {
        let err: &(dyn std::error::Error + 'static) = self;
        err.api_error()
    }
}
