use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;

pub(crate) const OAUTH_INVALID_GRANT: &str = "93801";
pub(crate) const OAUTH_INVALID_SCOPE: &str = "93803";
pub(crate) const OAUTH_INVALID_REQUEST: &str = "93804";
pub(crate) const OAUTH_UNSUPPORTED_GRANT_TYPE: &str = "93805";
pub(crate) const CUSTOMER_EMAIL_IS_INVALID: &str = "81604";
pub(crate) const CUSTOMER_EMAIL_IS_TOO_LONG: &str = "81605";
pub(crate) const CUSTOMER_FIRST_NAME_IS_TOO_LONG: &str = "81608";
pub(crate) const CUSTOMER_LAST_NAME_IS_TOO_LONG: &str = "81613";

/// A field level error, as sent in the `api_error_response` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FieldError {
    pub(crate) attribute: &'static str,
    pub(crate) code: &'static str,
    pub(crate) message: String,
}

impl FieldError {
    pub(crate) fn new(
        attribute: &'static str,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            attribute,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, derive_more::Error, derive_more::Display)]
pub(crate) enum ApiError {
    #[display("Authentication failed")]
    Unauthenticated,

    #[display("Not allowed to act for merchant {merchant_id}")]
    Forbidden { merchant_id: String },

    /// Rejected on business grounds, every error is attached to `object`.
    #[display("{}", errors.first().map_or("Validation failed", |it| it.message.as_str()))]
    Validation {
        object: &'static str,
        errors: Vec<FieldError>,
    },

    #[display("Internal error: {reason}")]
    Internal { reason: String },
}

impl ApiError {
    pub(crate) fn validation(object: &'static str, error: FieldError) -> Self {
        Self::Validation {
            object,
            errors: vec![error],
        }
    }

    pub(crate) fn invalid_grant(message: impl Into<String>) -> Self {
        Self::validation(
            "credentials",
            FieldError::new("code", OAUTH_INVALID_GRANT, message),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            Self::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, Json(json!({ "message": message }))).into_response()
            }
            Self::Validation { object, errors } => {
                let body = json!({
                    "api_error_response": {
                        "message": message,
                        "errors": { object: { "errors": errors } },
                    }
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": message })),
            )
                .into_response(),
        }
    }
}
