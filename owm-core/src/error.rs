use thiserror::Error;

use crate::measurement::QuantityKind;

/// Every failure the client can surface.
///
/// The set is closed: transport status codes are translated once, in
/// [`crate::transport::classify`], and nothing above that layer inspects raw
/// HTTP statuses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OwmError {
    /// A locator or modifier received an argument the provider would reject.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The API key is missing, wrong, or not activated yet.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The provider has no data for the query.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network failure, timeout, or an unexpected HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body does not have the expected shape.
    #[error("malformed response at `{path}`: {reason} (got: {snippet})")]
    MalformedResponse {
        path: String,
        reason: String,
        snippet: String,
    },

    /// A measurement was asked to hold a value outside its domain.
    #[error("invalid {kind} quantity: {value}")]
    InvalidQuantity { kind: QuantityKind, value: String },
}

impl OwmError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub(crate) fn malformed(
        path: impl Into<String>,
        reason: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            reason: reason.into(),
            snippet: truncate_body(&snippet.into()),
        }
    }
}

/// Cuts provider payloads down to something printable in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
