//! Decoder for the standard MailBreeze response envelope.
//!
//! Every API response is expected to look like
//! `{"success": bool, "data": ..., "error": {...}, "meta": ...}`. The HTTP
//! status and the envelope's own `success` flag can disagree, so the decoder
//! applies a fixed precedence:
//!
//! 1. `204 No Content` is a success with nothing to decode.
//! 2. A body that is not an envelope is an error if the status is >= 400,
//!    otherwise a success with nothing to decode. A JSON `null` body counts
//!    as an envelope with no fields set.
//! 3. `success: false` or a present `error` object is an error. A status
//!    below 400 is reported as 400.
//! 4. A status >= 400 is an error even when the envelope claims success.
//! 5. Anything else is a success carrying the raw `data` payload.

use crate::{retry::parse_retry_after, ApiError, Error, Result};
use http::{HeaderMap, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{value::RawValue, Map, Value};

/// Header carrying the server's correlation id for an exchange.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const UNKNOWN_MESSAGE: &str = "Unknown error";
const UNKNOWN_CODE: &str = "UNKNOWN_ERROR";

/// The wire shape of every response body.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Box<RawValue>>,
    #[serde(default)]
    error: Option<EnvelopeError>,
    #[serde(default)]
    meta: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<Map<String, Value>>,
}

/// Outcome of decoding one HTTP exchange.
#[derive(Debug)]
pub enum Decoded {
    /// The call succeeded. `data` is `None` when there is nothing to decode.
    Success {
        /// The undecoded `data` payload.
        data: Option<Box<RawValue>>,
        /// The undecoded `meta` payload, if any.
        meta: Option<Box<RawValue>>,
    },
    /// The API rejected the call.
    Failure(ApiError),
}

impl Decoded {
    fn empty() -> Self {
        Decoded::Success {
            data: None,
            meta: None,
        }
    }
}

/// Reads the request id header, if present and printable.
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)?
        .to_str()
        .ok()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Decodes a raw response into a success payload or an [`ApiError`].
///
/// # Examples
///
/// ```
/// use mailbreeze::envelope::{decode, Decoded};
/// use http::{HeaderMap, StatusCode};
///
/// let body = br#"{"success": false}"#;
/// match decode(StatusCode::OK, &HeaderMap::new(), body) {
///     Decoded::Failure(err) => {
///         assert_eq!(err.status_code, 400);
///         assert_eq!(err.code, "UNKNOWN_ERROR");
///     }
///     Decoded::Success { .. } => unreachable!(),
/// }
/// ```
pub fn decode(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Decoded {
    if status == StatusCode::NO_CONTENT {
        return Decoded::empty();
    }

    let request_id = request_id(headers);
    let retry_after = parse_retry_after(headers);
    let code = status.as_u16();

    // A literal `null` body reads as an envelope with every field unset.
    let envelope: Envelope = match serde_json::from_slice::<Option<Envelope>>(body) {
        Ok(envelope) => envelope.unwrap_or_default(),
        Err(e) => {
            if code >= 400 {
                return Decoded::Failure(ApiError::from_status(
                    code,
                    UNKNOWN_MESSAGE,
                    "",
                    request_id,
                    retry_after,
                ));
            }
            tracing::debug!(
                status = code,
                error = %e,
                "Response body is not an envelope; treating as empty success"
            );
            return Decoded::empty();
        }
    };

    if !envelope.success || envelope.error.is_some() {
        let effective = if code >= 400 { code } else { 400 };
        let err = match envelope.error {
            Some(e) => ApiError::new(
                effective,
                e.message,
                e.code,
                request_id,
                retry_after,
                e.details.unwrap_or_default(),
            ),
            None => ApiError::new(
                effective,
                UNKNOWN_MESSAGE,
                UNKNOWN_CODE,
                request_id,
                retry_after,
                Map::new(),
            ),
        };
        return Decoded::Failure(err);
    }

    if code >= 400 {
        return Decoded::Failure(ApiError::from_status(
            code,
            UNKNOWN_MESSAGE,
            "",
            request_id,
            retry_after,
        ));
    }

    let data = envelope.data.filter(|raw| raw.get() != "null");
    Decoded::Success {
        data,
        meta: envelope.meta,
    }
}

/// Deserializes a raw `data` payload into `T`.
///
/// A mismatch is a transport-level [`Error::DeserializationFailed`], not an
/// API error.
pub fn decode_data<T>(raw: &RawValue, status: StatusCode) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(raw.get()).map_err(|e| {
        tracing::error!(
            error = %e,
            raw_response = %raw.get(),
            "Failed to deserialize response data"
        );
        Error::DeserializationFailed {
            raw_response: raw.get().to_string(),
            serde_error: e.to_string(),
            status,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn failure(decoded: Decoded) -> ApiError {
        match decoded {
            Decoded::Failure(err) => err,
            Decoded::Success { data, .. } => panic!("expected failure, got success {:?}", data),
        }
    }

    fn success_data(decoded: Decoded) -> Option<String> {
        match decoded {
            Decoded::Success { data, .. } => data.map(|raw| raw.get().to_string()),
            Decoded::Failure(err) => panic!("expected success, got {}", err),
        }
    }

    #[test]
    fn test_no_content_ignores_body() {
        let decoded = decode(StatusCode::NO_CONTENT, &HeaderMap::new(), b"{not json");
        assert_eq!(success_data(decoded), None);
    }

    #[test]
    fn test_success_passes_data_through() {
        let body = br#"{"success":true,"data":{"id":"email_1"},"meta":{"page":1}}"#;
        match decode(StatusCode::OK, &HeaderMap::new(), body) {
            Decoded::Success { data, meta } => {
                assert_eq!(data.unwrap().get(), r#"{"id":"email_1"}"#);
                assert_eq!(meta.unwrap().get(), r#"{"page":1}"#);
            }
            Decoded::Failure(err) => panic!("unexpected failure: {}", err),
        }
    }

    #[test]
    fn test_null_data_is_absent() {
        let body = br#"{"success":true,"data":null}"#;
        assert_eq!(success_data(decode(StatusCode::OK, &HeaderMap::new(), body)), None);
    }

    #[test]
    fn test_malformed_body_with_error_status() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req_9"));
        headers.insert("retry-after", HeaderValue::from_static("7"));

        let err = failure(decode(StatusCode::BAD_GATEWAY, &headers, b"<html>Bad Gateway</html>"));
        assert_eq!(err.status_code, 502);
        assert_eq!(err.code, "SERVER_ERROR");
        assert_eq!(err.message, "Unknown error");
        assert_eq!(err.request_id.as_deref(), Some("req_9"));
        assert_eq!(err.retry_after, 7);
    }

    #[test]
    fn test_malformed_body_with_ok_status() {
        assert_eq!(success_data(decode(StatusCode::OK, &HeaderMap::new(), b"plain text")), None);
    }

    #[test]
    fn test_null_body_is_an_unset_envelope() {
        let err = failure(decode(StatusCode::OK, &HeaderMap::new(), b"null"));
        assert_eq!(err.status_code, 400);
        assert_eq!(err.code, "UNKNOWN_ERROR");
        assert_eq!(err.message, "Unknown error");

        let err = failure(decode(StatusCode::SERVICE_UNAVAILABLE, &HeaderMap::new(), b" null "));
        assert_eq!(err.status_code, 503);
    }

    #[test]
    fn test_success_false_without_error_object() {
        let err = failure(decode(StatusCode::OK, &HeaderMap::new(), br#"{"success":false}"#));
        assert_eq!(err.status_code, 400);
        assert_eq!(err.code, "UNKNOWN_ERROR");
        assert_eq!(err.message, "Unknown error");
    }

    #[test]
    fn test_success_false_with_error_object() {
        let body = br#"{
            "success": false,
            "error": {"code": "INVALID_EMAIL", "message": "Bad address", "details": {"field": "to"}}
        }"#;
        let err = failure(decode(StatusCode::UNPROCESSABLE_ENTITY, &HeaderMap::new(), body));
        assert_eq!(err.status_code, 422);
        assert_eq!(err.code, "INVALID_EMAIL");
        assert_eq!(err.message, "Bad address");
        assert_eq!(err.details.get("field"), Some(&Value::String("to".into())));
    }

    #[test]
    fn test_error_object_forces_failure_even_with_success_true() {
        let body = br#"{"success":true,"error":{"code":"VALIDATION_ERROR","message":"nope"}}"#;
        let err = failure(decode(StatusCode::BAD_REQUEST, &HeaderMap::new(), body));
        assert_eq!(err.status_code, 400);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.message, "nope");

        let err = failure(decode(StatusCode::CREATED, &HeaderMap::new(), body));
        assert_eq!(err.status_code, 400);
    }

    #[test]
    fn test_error_status_wins_over_success_flag() {
        let body = br#"{"success":true,"data":{"id":"x"}}"#;
        let err = failure(decode(StatusCode::NOT_FOUND, &HeaderMap::new(), body));
        assert_eq!(err.status_code, 404);
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.message, "Unknown error");
    }

    #[test]
    fn test_decode_data_mismatch_is_transport_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Thing {
            id: u32,
        }

        let raw = RawValue::from_string(r#"{"id":"not-a-number"}"#.to_string()).unwrap();
        match decode_data::<Thing>(&raw, StatusCode::OK) {
            Err(Error::DeserializationFailed { raw_response, status, .. }) => {
                assert_eq!(status, StatusCode::OK);
                assert!(raw_response.contains("not-a-number"));
            }
            other => panic!("expected DeserializationFailed, got {:?}", other),
        }
    }
}
