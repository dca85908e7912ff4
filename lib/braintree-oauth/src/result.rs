use crate::validation::ValidationErrors;

/// A failed gateway operation: the server rejected the request on
/// business grounds and explained why, field by field.
///
/// An `ErrorResponse` always carries at least one validation error.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{message}")]
pub struct ErrorResponse {
    message: String,
    errors: ValidationErrors,
}

impl ErrorResponse {
    /// Returns `None` when `errors` is empty.
    pub(crate) fn new(message: String, errors: ValidationErrors) -> Option<Self> {
        (!errors.is_empty()).then_some(Self { message, errors })
    }

    /// Returns the summary message sent by the gateway.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the validation errors.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }
}

/// Outcome of a gateway operation that reached the gateway and got an
/// answer.
///
/// Business rejections (an unknown authorization code, an invalid email)
/// are reported as [`GatewayResult::Failure`]. Authentication, network and
/// server failures never show up here: they are returned as
/// [`GatewayError`](crate::GatewayError) by the calling operation.
///
/// # Example
///
/// ```rust,ignore
/// let result = gateway.oauth().create_token_from_code(&request).await?;
/// match result {
///     GatewayResult::Success(credentials) => store(credentials),
///     GatewayResult::Failure(failure) => {
///         for error in failure.errors().deep_all() {
///             tracing::warn!(code = %error.code(), "{}", error.message());
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult<T> {
    /// The operation succeeded.
    Success(T),
    /// The gateway rejected the operation.
    Failure(ErrorResponse),
}

impl<T> GatewayResult<T> {
    /// Returns `true` for [`GatewayResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success value, if any.
    pub fn target(&self) -> Option<&T> {
        match self {
            Self::Success(target) => Some(target),
            Self::Failure(_) => None,
        }
    }

    /// Consumes the result and returns the success value, if any.
    pub fn into_target(self) -> Option<T> {
        match self {
            Self::Success(target) => Some(target),
            Self::Failure(_) => None,
        }
    }

    /// Returns the validation errors, empty on success.
    pub fn errors(&self) -> &ValidationErrors {
        match self {
            Self::Success(_) => ValidationErrors::empty(),
            Self::Failure(failure) => failure.errors(),
        }
    }

    /// Returns the failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.message()),
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorResponse`] of a failure.
    pub fn into_result(self) -> Result<T, ErrorResponse> {
        match self {
            Self::Success(target) => Ok(target),
            Self::Failure(failure) => Err(failure),
        }
    }

    /// Maps the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayResult<U> {
        match self {
            Self::Success(target) => GatewayResult::Success(f(target)),
            Self::Failure(failure) => GatewayResult::Failure(failure),
        }
    }
}
