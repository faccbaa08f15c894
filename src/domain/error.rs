use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::routing::{Llm, Provider};

/// Status sentinel used when a failure produced no real HTTP status.
/// Internal marker only, never a genuine protocol outcome.
const UNEXPECTED_STATUS: u16 = 418;

const UNEXPECTED_MESSAGE: &str = "Failed to create chat completion due to an unexpected error";

/// Errors produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Failure response from the routing API, classified by status code
    /// and error payload
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A streamed line could not be decoded as a chunk record; fatal to
    /// the in-progress stream
    #[error("failed to decode stream chunk: {reason}")]
    StreamDecode { reason: String },
}

impl Error {
    pub(crate) fn stream_decode(reason: impl Into<String>) -> Self {
        Self::StreamDecode {
            reason: reason.into(),
        }
    }
}

/// Classification of an API failure.
///
/// Domain kinds (`ProviderModeration`, `Configuration`) are selected by the
/// payload's machine error code and win over status dispatch; the rest are
/// indexed by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    MethodNotAllowed,
    Conflict,
    PreconditionFailed,
    UnprocessableEntity,
    RateLimit,
    InternalServer,
    BadGateway,
    ProviderModeration,
    Configuration,
    /// No recognized status and no domain error code
    Unknown,
}

impl ApiErrorKind {
    fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Authentication),
            403 => Some(Self::PermissionDenied),
            404 => Some(Self::NotFound),
            405 => Some(Self::MethodNotAllowed),
            409 => Some(Self::Conflict),
            412 => Some(Self::PreconditionFailed),
            422 => Some(Self::UnprocessableEntity),
            429 => Some(Self::RateLimit),
            500 => Some(Self::InternalServer),
            502 => Some(Self::BadGateway),
            _ => None,
        }
    }
}

/// Diagnostics identifying which upstream model/provider attempt failed,
/// attached when the server reports them
#[derive(Debug, Clone, Deserialize)]
pub struct RouterDetails {
    pub model: Option<Llm>,
    pub provider: Option<Provider>,
    pub provider_response: Option<Value>,
}

/// Failure response from the routing API.
///
/// Immutable; constructed at the point of failure and raised synchronously.
/// Structured fields are populated when derivable from the response and
/// left `None` otherwise — absence is never conflated with an empty value.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, absent for failures that produced none
    pub status: Option<u16>,
    /// Raw error payload as returned by the server
    pub error: Option<Value>,
    /// Machine error code from the payload
    pub code: Option<String>,
    /// Offending parameter name from the payload
    pub param: Option<String>,
    /// Error type tag from the payload
    pub error_type: Option<String>,
    /// Routing diagnostics from the payload's `detail.router_details`
    pub router_details: Option<RouterDetails>,
    message: String,
}

impl ApiError {
    /// Classify a failure from its HTTP status and parsed error payload.
    ///
    /// `fallback_message` is used only when the payload yields no message
    /// of its own (typically the status line's canonical reason).
    pub fn classify(status: Option<u16>, payload: Option<Value>, fallback_message: &str) -> Self {
        let payload = payload.filter(|p| !p.is_null());

        let kind = match domain_error_code(payload.as_ref()) {
            Some("provider_moderation") => ApiErrorKind::ProviderModeration,
            Some("configuration_error") => ApiErrorKind::Configuration,
            _ => status
                .and_then(ApiErrorKind::from_status)
                .unwrap_or(ApiErrorKind::Unknown),
        };

        let message = make_message(status, payload.as_ref(), fallback_message);

        let code = string_field(payload.as_ref(), "code");
        let param = string_field(payload.as_ref(), "param");
        let error_type = string_field(payload.as_ref(), "type");

        let router_details = payload
            .as_ref()
            .and_then(|p| p.pointer("/detail/router_details"))
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok());

        Self {
            kind,
            status,
            error: payload,
            code,
            param,
            error_type,
            router_details,
            message,
        }
    }

    /// Generic wrap for faults with no classified cause: transport errors,
    /// malformed bodies, anything unforeseen. Carries the non-semantic
    /// status sentinel rather than a real protocol code.
    pub(crate) fn unexpected() -> Self {
        Self::classify(Some(UNEXPECTED_STATUS), None, UNEXPECTED_MESSAGE)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn domain_error_code(payload: Option<&Value>) -> Option<&str> {
    payload
        .and_then(|p| p.pointer("/detail/error_code"))
        .and_then(Value::as_str)
}

fn string_field(payload: Option<&Value>, field: &str) -> Option<String> {
    payload
        .and_then(|p| p.get(field))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Deterministic message construction: prefer the payload's own `message`
/// field (stringified if not already a string), else the whole payload,
/// else the supplied fallback.
fn make_message(status: Option<u16>, payload: Option<&Value>, fallback: &str) -> String {
    let msg = match payload {
        Some(p) => match p.get("message") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => Some(p.to_string()),
            Some(other) => Some(other.to_string()),
        },
        None if fallback.is_empty() => None,
        None => Some(fallback.to_string()),
    };

    match (status, msg) {
        (Some(status), Some(msg)) => format!("{} {}", status, msg),
        (Some(status), None) => format!("{} status code (no body)", status),
        (None, Some(msg)) => msg,
        (None, None) => "(no status code or body)".to_string(),
    }
}
