//! Call descriptors and per-call options.

use http::{HeaderValue, Method};
use std::fmt;

/// Header carrying the caller's idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// A request path, held as unencoded segments.
///
/// Strings are split on `/`. Segments added with [`ApiPath::segment`] are
/// kept whole and percent-encoded when the URL is built, so a caller's id
/// can never add segments, a query or a fragment.
///
/// # Examples
///
/// ```
/// use mailbreeze::ApiPath;
///
/// let path = ApiPath::from("/contact-lists").segment("list/1").segment("stats");
/// assert_eq!(path.segments(), ["contact-lists", "list/1", "stats"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Appends one segment verbatim.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Returns the unencoded segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for ApiPath {
    fn from(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<String> for ApiPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&String> for ApiPath {
    fn from(path: &String) -> Self {
        Self::from(path.as_str())
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Method, path, and query of a single API call.
///
/// The path is relative to the client's base URL.
///
/// # Examples
///
/// ```
/// use mailbreeze::Endpoint;
/// use http::Method;
///
/// let endpoint = Endpoint::new(Method::GET, "/emails")
///     .with_query_param("status", "sent")
///     .with_query_param("page", "2");
/// assert_eq!(endpoint.query.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// The HTTP method.
    pub method: Method,

    /// The request path, relative to the base URL.
    pub path: ApiPath,

    /// Query parameters, sent in insertion order.
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    /// Creates an endpoint with no query parameters.
    pub fn new(method: Method, path: impl Into<ApiPath>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends multiple query parameters.
    pub fn with_query_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }
}

/// Options for a single call.
///
/// # Examples
///
/// ```
/// use mailbreeze::RequestOptions;
///
/// let options = RequestOptions::new().idempotency_key("welcome-user-42");
/// assert!(options.idempotency_header().is_some());
///
/// // Keys that could smuggle extra headers are dropped, not rejected.
/// let options = RequestOptions::new().idempotency_key("key\r\nX-Injected: bad");
/// assert!(options.idempotency_header().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    idempotency_key: Option<String>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the idempotency key sent as `X-Idempotency-Key`.
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Returns the raw idempotency key as supplied.
    pub fn get_idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Returns the header value for the idempotency key, if it is safe to send.
    ///
    /// The key's bytes are sent unchanged, UTF-8 included. Empty keys and
    /// keys containing CR or LF (or any control byte that is not a legal
    /// header value) yield `None` and the call proceeds without them.
    pub fn idempotency_header(&self) -> Option<HeaderValue> {
        let key = self.idempotency_key.as_deref().filter(|k| !k.is_empty())?;
        if key.contains(['\r', '\n']) {
            tracing::warn!("Idempotency key contains CR/LF; sending request without it");
            return None;
        }
        match HeaderValue::from_bytes(key.as_bytes()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Idempotency key is not a valid header value; sending request without it");
                None
            }
        }
    }
}
