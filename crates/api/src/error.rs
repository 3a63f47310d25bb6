//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CartError, CartErrorKind, CartOperation, Notification};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// A cart operation was rejected.
    Cart {
        operation: CartOperation,
        error: CartError,
    },
}

impl ApiError {
    /// Wraps a cart error raised by `operation`.
    pub fn cart(operation: CartOperation, error: CartError) -> Self {
        ApiError::Cart { operation, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg, "kind": "bad_request" }),
            ),
            ApiError::Cart { operation, error } => {
                let status = cart_error_status(error.kind());
                if status.is_server_error() {
                    tracing::error!(%operation, %error, "cart operation failed");
                }
                let notification = Notification::for_error(operation, &error);
                (
                    status,
                    serde_json::json!({
                        "error": error.to_string(),
                        "kind": notification.kind.as_str(),
                        "message": notification.message,
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_status(kind: CartErrorKind) -> StatusCode {
    match kind {
        CartErrorKind::InvalidQuantity => StatusCode::BAD_REQUEST,
        CartErrorKind::ProductNotFound => StatusCode::NOT_FOUND,
        CartErrorKind::InsufficientStock | CartErrorKind::AlreadyInCart => StatusCode::CONFLICT,
        CartErrorKind::ProductFetch => StatusCode::BAD_GATEWAY,
        CartErrorKind::CorruptCart | CartErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_status_mapping() {
        assert_eq!(
            cart_error_status(CartErrorKind::InvalidQuantity),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            cart_error_status(CartErrorKind::ProductNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            cart_error_status(CartErrorKind::InsufficientStock),
            StatusCode::CONFLICT
        );
        assert_eq!(
            cart_error_status(CartErrorKind::ProductFetch),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            cart_error_status(CartErrorKind::Storage),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
