//! HTTP transport for the MailBreeze API.
//!
//! The [`Client`] type is the main entry point. It builds every request,
//! runs the retry loop, and hands each raw response to the envelope
//! decoder. Use [`ClientBuilder`] to configure it.

use crate::{
    cancel::Context,
    envelope::{self, Decoded},
    request::{ApiPath, Endpoint, RequestOptions, IDEMPOTENCY_KEY_HEADER},
    resources::{Attachments, Automations, Contacts, Emails, Lists, Verification},
    retry::{RetryOnRetryable, RetryPolicy, RetryPredicate},
    Error, Response, Result,
};
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// The production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mailbreeze.com/api/v1";

/// The default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// The `User-Agent` sent with every request.
pub const USER_AGENT_VALUE: &str = concat!("mailbreeze-rust/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";
const REDACTED: &str = "[REDACTED]";

/// A MailBreeze API client.
///
/// Cloning is cheap: clones share the connection pool and the configuration,
/// which is fixed once the client is built. The client keeps no per-call
/// state, so one instance can serve any number of concurrent calls.
///
/// # Examples
///
/// ```no_run
/// use mailbreeze::{Client, RequestOptions};
/// use mailbreeze::types::SendEmailParams;
///
/// # async fn example() -> Result<(), mailbreeze::Error> {
/// let client = Client::new("sk_live_xxx")?;
///
/// let params = SendEmailParams {
///     from: "hello@yourdomain.com".to_string(),
///     to: vec!["user@example.com".to_string()],
///     subject: Some("Welcome!".to_string()),
///     html: Some("<h1>Welcome!</h1>".to_string()),
///     ..Default::default()
/// };
/// let options = RequestOptions::new().idempotency_key("welcome-user-42");
/// let email = client.emails().send(&params, &options).await?;
/// println!("queued {}", email.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    context: Context,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: HeaderValue,
    retry_policy: RetryPolicy,
    retry_predicate: Box<dyn RetryPredicate>,
    timeout: Option<Duration>,
}

/// One HTTP exchange, decoded.
struct Exchange {
    status: StatusCode,
    headers: HeaderMap,
    decoded: Decoded,
}

impl Client {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or not a valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns a handle whose calls are bounded by `context`.
    ///
    /// The handle shares this client's configuration and connection pool.
    pub fn with_context(&self, context: Context) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            context,
        }
    }

    /// Returns the context bounding this handle's calls.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry_policy
    }

    /// Email operations.
    pub fn emails(&self) -> Emails {
        Emails::new(self.clone())
    }

    /// Contact list operations.
    pub fn lists(&self) -> Lists {
        Lists::new(self.clone())
    }

    /// Contact operations scoped to one list.
    pub fn contacts(&self, list_id: impl Into<String>) -> Contacts {
        Contacts::new(self.clone(), list_id.into())
    }

    /// Attachment upload operations.
    pub fn attachments(&self) -> Attachments {
        Attachments::new(self.clone())
    }

    /// Email verification operations.
    pub fn verification(&self) -> Verification {
        Verification::new(self.clone())
    }

    /// Automation enrollment operations.
    pub fn automations(&self) -> Automations {
        Automations::new(self.clone())
    }

    /// Makes a typed API call.
    ///
    /// The body is serialized once and the same bytes are sent on every
    /// attempt. Transport failures and API errors with status 429 or >= 500
    /// are retried according to the client's [`RetryPolicy`]; any other
    /// error is returned at once.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mailbreeze::{Client, Endpoint, RequestOptions};
    /// use http::Method;
    /// use serde_json::{json, Value};
    ///
    /// # async fn example() -> Result<(), mailbreeze::Error> {
    /// let client = Client::new("sk_live_xxx")?;
    ///
    /// let endpoint = Endpoint::new(Method::POST, "/email-verification/single");
    /// let body = json!({ "email": "user@example.com" });
    /// let response = client
    ///     .call::<_, Value>(endpoint, Some(&body), &RequestOptions::new())
    ///     .await?;
    /// println!("{:?}", response.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        endpoint: Endpoint,
        body: Option<&Req>,
        options: &RequestOptions,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| Error::SerializationFailed(e.to_string()))?;
        let url = self.url_for(&endpoint);
        let headers = self.headers_for(options);
        let policy = self.inner.retry_policy;
        let max_attempts = policy.max_attempts();

        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = self
                .context
                .run(self.execute(&endpoint.method, &url, &headers, body.as_deref(), attempt))
                .await?;

            let error = match outcome {
                Ok(Exchange {
                    status,
                    headers,
                    decoded: Decoded::Success { data, meta },
                }) => {
                    let data = data
                        .map(|raw| envelope::decode_data::<Res>(&raw, status))
                        .transpose()?;
                    return Ok(Response::new(
                        data,
                        meta,
                        status,
                        headers,
                        start_time.elapsed(),
                        attempt,
                    ));
                }
                Ok(Exchange {
                    decoded: Decoded::Failure(api),
                    ..
                }) => Error::Api(api),
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                method = %endpoint.method,
                path = %endpoint.path,
                "Request failed"
            );

            if attempt >= max_attempts || !self.inner.retry_predicate.should_retry(&error, attempt) {
                return Err(error);
            }

            let delay = policy.delay_for(attempt, &error);
            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                attempt = attempt,
                "Retrying request after delay"
            );
            self.context.run(tokio::time::sleep(delay)).await?;
        }
    }

    /// Executes a single attempt and decodes its response.
    async fn execute(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        attempt: u32,
    ) -> Result<Exchange> {
        tracing::debug!(
            method = %method,
            url = %url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let started = Instant::now();
        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .headers(headers.clone());

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            attempt = attempt,
            "Received HTTP response"
        );

        if status == StatusCode::NO_CONTENT {
            let decoded = envelope::decode(status, &headers, &[]);
            return Ok(Exchange {
                status,
                headers,
                decoded,
            });
        }

        let raw_body = response.bytes().await?;
        let decoded = envelope::decode(status, &headers, &raw_body);

        if let Decoded::Failure(api) = &decoded {
            if api.status_code >= 500 {
                tracing::warn!(status = api.status_code, code = %api.code, "Server error");
            } else {
                tracing::error!(status = api.status_code, code = %api.code, "Client error");
            }
        }

        Ok(Exchange {
            status,
            headers,
            decoded,
        })
    }

    /// Joins the endpoint path onto the base URL and appends the query.
    ///
    /// Each segment is percent-encoded, `/` included.
    fn url_for(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.inner.base_url.clone();
        // `build` rejects bases that cannot carry a path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.path.segments());
        }

        if !endpoint.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&endpoint.query);
        }
        url
    }

    /// Builds the headers shared by every attempt of one call.
    fn headers_for(&self, options: &RequestOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), self.inner.api_key.clone());
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Some(key) = options.idempotency_header() {
            headers.insert(HeaderName::from_static(IDEMPOTENCY_KEY_HEADER), key);
        }
        headers
    }

    /// Makes a GET request.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mailbreeze::Client;
    /// use serde_json::Value;
    ///
    /// # async fn example() -> Result<(), mailbreeze::Error> {
    /// let client = Client::new("sk_live_xxx")?;
    /// let query = vec![("status".to_string(), "sent".to_string())];
    /// let page = client.get::<Value>("/emails", query).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(
        &self,
        path: impl Into<ApiPath>,
        query: Vec<(String, String)>,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let endpoint = Endpoint::new(Method::GET, path).with_query_params(query);
        self.call::<(), Res>(endpoint, None, &RequestOptions::default())
            .await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<Req, Res>(
        &self,
        path: impl Into<ApiPath>,
        body: &Req,
        options: &RequestOptions,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let endpoint = Endpoint::new(Method::POST, path);
        self.call(endpoint, Some(body), options).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl Into<ApiPath>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let endpoint = Endpoint::new(Method::PUT, path);
        self.call(endpoint, Some(body), &RequestOptions::default())
            .await
    }

    /// Makes a PATCH request with a JSON body.
    pub async fn patch<Req, Res>(&self, path: impl Into<ApiPath>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let endpoint = Endpoint::new(Method::PATCH, path);
        self.call(endpoint, Some(body), &RequestOptions::default())
            .await
    }

    /// Makes a DELETE request. Any payload in the response is ignored.
    pub async fn delete(&self, path: impl Into<ApiPath>) -> Result<Response<()>> {
        let endpoint = Endpoint::new(Method::DELETE, path);
        let response = self
            .call::<(), IgnoredAny>(endpoint, None, &RequestOptions::default())
            .await?;
        Ok(response.map(|_| ()))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("max_retries", &self.inner.retry_policy.max_retries)
            .field("timeout", &self.inner.timeout)
            .field("api_key", &REDACTED)
            .finish()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use mailbreeze::{ClientBuilder, RetryPolicy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), mailbreeze::Error> {
/// let client = ClientBuilder::new()
///     .api_key("sk_live_xxx")
///     .base_url("https://api.mailbreeze.com/api/v1")?
///     .timeout(Duration::from_secs(10))
///     .retry_policy(RetryPolicy {
///         max_retries: 5,
///         initial_delay: Duration::from_millis(500),
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<Url>,
    retry_policy: RetryPolicy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            retry_policy: RetryPolicy::default(),
            retry_predicate: None,
            timeout: Some(DEFAULT_TIMEOUT),
            http_client: None,
        }
    }

    /// Sets the API key sent as `X-API-Key`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the base URL. Defaults to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the number of retries after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry_policy.max_retries = max_retries;
        self
    }

    /// Sets the whole retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a custom retry predicate.
    ///
    /// By default, requests are retried based on `Error::is_retryable()`.
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets the per-attempt timeout. Defaults to [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables the per-attempt timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Uses a preconfigured `reqwest::Client` (proxies, TLS, pool tuning).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, empty, or not a valid
    /// header value, or if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::ConfigurationError("API key is required".to_string()))?;
        let mut api_key = HeaderValue::from_str(&api_key).map_err(|_| {
            Error::ConfigurationError("API key is not a valid header value".to_string())
        })?;
        api_key.set_sensitive(true);

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        if base_url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Base URL {} cannot carry a path",
                base_url
            )));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnRetryable));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                api_key,
                retry_policy: self.retry_policy,
                retry_predicate,
                timeout: self.timeout,
            }),
            context: Context::background(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("retry_policy", &self.retry_policy)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .finish()
    }
}
