use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Deserialize;

static EMPTY: LazyLock<ValidationErrors> = LazyLock::new(ValidationErrors::default);

/// Kind of a validation error, as reported by the gateway.
///
/// The gateway identifies error kinds with numeric codes. Codes this SDK
/// does not know about are kept verbatim in [`ValidationErrorCode::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ValidationErrorCode {
    /// The authorization code or refresh token does not exist, expired, or was already used.
    OAuthInvalidGrant,
    /// The client credentials were rejected.
    OAuthInvalidCredentials,
    /// The requested scope is not allowed for this grant.
    OAuthInvalidScope,
    /// The request is malformed.
    OAuthInvalidRequest,
    /// The `grant_type` is not supported.
    OAuthUnsupportedGrantType,
    /// The customer email is not a valid address.
    CustomerEmailIsInvalid,
    /// The customer email is too long.
    CustomerEmailIsTooLong,
    /// The customer first name is too long.
    CustomerFirstNameIsTooLong,
    /// The customer last name is too long.
    CustomerLastNameIsTooLong,
    /// A code unknown to this SDK.
    Unknown(String),
}

impl ValidationErrorCode {
    /// Returns the numeric gateway code.
    pub fn code(&self) -> &str {
        match self {
            Self::OAuthInvalidGrant => "93801",
            Self::OAuthInvalidCredentials => "93802",
            Self::OAuthInvalidScope => "93803",
            Self::OAuthInvalidRequest => "93804",
            Self::OAuthUnsupportedGrantType => "93805",
            Self::CustomerEmailIsInvalid => "81604",
            Self::CustomerEmailIsTooLong => "81605",
            Self::CustomerFirstNameIsTooLong => "81608",
            Self::CustomerLastNameIsTooLong => "81613",
            Self::Unknown(code) => code,
        }
    }

    /// Returns the conventional constant name, e.g. `OAUTH_INVALID_GRANT`.
    pub fn name(&self) -> &str {
        match self {
            Self::OAuthInvalidGrant => "OAUTH_INVALID_GRANT",
            Self::OAuthInvalidCredentials => "OAUTH_INVALID_CREDENTIALS",
            Self::OAuthInvalidScope => "OAUTH_INVALID_SCOPE",
            Self::OAuthInvalidRequest => "OAUTH_INVALID_REQUEST",
            Self::OAuthUnsupportedGrantType => "OAUTH_UNSUPPORTED_GRANT_TYPE",
            Self::CustomerEmailIsInvalid => "CUSTOMER_EMAIL_IS_INVALID",
            Self::CustomerEmailIsTooLong => "CUSTOMER_EMAIL_IS_TOO_LONG",
            Self::CustomerFirstNameIsTooLong => "CUSTOMER_FIRST_NAME_IS_TOO_LONG",
            Self::CustomerLastNameIsTooLong => "CUSTOMER_LAST_NAME_IS_TOO_LONG",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<String> for ValidationErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "93801" => Self::OAuthInvalidGrant,
            "93802" => Self::OAuthInvalidCredentials,
            "93803" => Self::OAuthInvalidScope,
            "93804" => Self::OAuthInvalidRequest,
            "93805" => Self::OAuthUnsupportedGrantType,
            "81604" => Self::CustomerEmailIsInvalid,
            "81605" => Self::CustomerEmailIsTooLong,
            "81608" => Self::CustomerFirstNameIsTooLong,
            "81613" => Self::CustomerLastNameIsTooLong,
            _ => Self::Unknown(code),
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// A single validation error attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationError {
    attribute: String,
    code: ValidationErrorCode,
    message: String,
}

impl ValidationError {
    /// Returns the wire name of the offending field, e.g. `code`.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the error kind.
    pub fn code(&self) -> &ValidationErrorCode {
        &self.code
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validation errors grouped by object, then by field.
///
/// Lookups accept either the wire names (`credentials`, `refresh_token`)
/// or the SDK-style names (`Credentials`, `RefreshToken`). Missing objects
/// and fields yield empty results, so lookups never fail.
///
/// # Example
///
/// ```rust,ignore
/// let errors = result.errors();
/// let on_code = errors.for_object("Credentials").on_field("Code");
/// if let Some(error) = on_code.first() {
///     assert_eq!(error.code(), &ValidationErrorCode::OAuthInvalidGrant);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationErrors {
    #[serde(default)]
    errors: Vec<ValidationError>,
    #[serde(flatten)]
    nested: IndexMap<String, ValidationErrors>,
}

impl ValidationErrors {
    pub(crate) fn empty() -> &'static Self {
        &EMPTY
    }

    /// Returns the errors of a nested object, or an empty set.
    pub fn for_object(&self, name: &str) -> &Self {
        self.nested.get(&wire_key(name)).unwrap_or(Self::empty())
    }

    /// Returns the errors on a field of this object, in server order.
    pub fn on_field(&self, name: &str) -> Vec<&ValidationError> {
        let key = wire_key(name);
        self.errors
            .iter()
            .filter(|error| error.attribute == key)
            .collect()
    }

    /// Returns the errors at this level, without nested objects.
    pub fn all(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns every error, depth-first.
    pub fn deep_all(&self) -> Vec<&ValidationError> {
        let mut result = self.errors.iter().collect::<Vec<_>>();
        for nested in self.nested.values() {
            result.extend(nested.deep_all());
        }
        result
    }

    /// Returns the number of errors at this level.
    pub fn size(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of errors including nested objects.
    pub fn deep_size(&self) -> usize {
        self.errors.len() + self.nested.values().map(Self::deep_size).sum::<usize>()
    }

    /// Returns `true` if there is no error at any depth.
    pub fn is_empty(&self) -> bool {
        self.deep_size() == 0
    }
}

fn wire_key(name: &str) -> String {
    use cruet::*;
    name.to_snake_case()
}
