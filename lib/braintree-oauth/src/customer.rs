//! Merchant customers.
//!
//! Only creation is supported. It is the smallest call authenticated with a
//! merchant access token, which makes it the way to check that a token is
//! still accepted.

use jiff::Timestamp;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GatewayError;
use crate::http::Http;
use crate::result::GatewayResult;

/// Customer fields sent to the gateway.
///
/// # Example
///
/// ```rust
/// use braintree_oauth::CustomerRequest;
///
/// let request = CustomerRequest::new()
///     .with_first_name("Ada")
///     .with_email("ada@example.com");
/// assert_eq!(request.email(), Some("ada@example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl CustomerRequest {
    /// Creates an empty request; the gateway accepts customers without fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the customer id instead of letting the gateway generate one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the company.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Returns the email.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A customer stored by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    created_at: Option<Timestamp>,
}

impl Customer {
    /// Returns the customer id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the first name.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the company.
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the email.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the phone number.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns when the customer was created.
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}

#[derive(Debug, Serialize)]
struct CustomerBody<'a> {
    customer: &'a CustomerRequest,
}

#[derive(Debug, Deserialize)]
struct CustomerEnvelope {
    customer: Customer,
}

/// Builds the customer collection path of a merchant.
///
/// The merchant id lands in a single escaped segment. Dot segments would be
/// resolved away by the URL parser, so `.` and `..` are refused.
fn customers_path(merchant_id: &str) -> Result<String, GatewayError> {
    if matches!(merchant_id, "" | "." | "..") {
        return Err(GatewayError::configuration(format!(
            "invalid merchant id {merchant_id:?}"
        )));
    }
    let merchant_id = utf8_percent_encode(merchant_id, NON_ALPHANUMERIC);
    Ok(format!("/merchants/{merchant_id}/customers"))
}

/// Customer operations of a merchant.
///
/// Obtained from [`BraintreeGateway::customer`](crate::BraintreeGateway::customer).
#[derive(Debug, Clone, Copy)]
pub struct CustomerGateway<'a> {
    http: &'a Http,
}

impl<'a> CustomerGateway<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Invalid customer fields come back as a [`GatewayResult::Failure`].
    /// A revoked or expired access token fails with
    /// [`GatewayError::Authentication`]. Fails with
    /// [`GatewayError::Configuration`] when no merchant id is known, or
    /// when it is `.` or `..`.
    pub async fn create(
        &self,
        request: &CustomerRequest,
    ) -> Result<GatewayResult<Customer>, GatewayError> {
        let merchant_id = self.http.config().merchant_id().ok_or_else(|| {
            GatewayError::configuration("creating a customer requires a merchant id")
        })?;

        debug!(%merchant_id, "creating customer");
        let path = customers_path(merchant_id)?;
        let result = self
            .http
            .post::<_, CustomerEnvelope>(&path, &CustomerBody { customer: request })
            .await?;
        Ok(result.map(|envelope| envelope.customer))
    }
}
