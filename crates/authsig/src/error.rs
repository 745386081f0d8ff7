use axum::http::StatusCode;
use axum_core::response::{IntoResponse as AxumCoreIntoResponse, Response};

/// Failures of the signature construction engine.
///
/// None of these are retried: the inputs are deterministic, so a retry
/// without new inputs would fail the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Payload cannot be canonicalized: {0}")]
    Encoding(String),
    #[error("Malformed authorization key: {0}")]
    KeyFormat(String),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Invalid signature encoding: {0}")]
    InvalidSignatureLength(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum AuthSigServerError {
    #[error(transparent)]
    Engine(#[from] Error),
    #[error("No authorization key registered for wallet {0}")]
    UnknownWallet(String),
}

/// Trait implementation to convert this error into an axum http response
impl AxumCoreIntoResponse for AuthSigServerError {
    fn into_response(self) -> Response {
        match self {
            unknown_wallet @ AuthSigServerError::UnknownWallet(_) => {
                (StatusCode::NOT_FOUND, unknown_wallet.to_string()).into_response()
            }
            bad_request @ AuthSigServerError::Engine(Error::KeyFormat(_) | Error::Encoding(_)) => {
                (StatusCode::BAD_REQUEST, bad_request.to_string()).into_response()
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something wrong happened.",
            )
                .into_response(),
        }
    }
}
