use indexmap::IndexMap;
use url::Url;

/// Request for [`OAuthGateway::connect_url`](super::OAuthGateway::connect_url).
///
/// Describes the page a merchant lands on to grant the application access.
/// The `user` and `business` entries prefill the signup form and are sent
/// as `user[<key>]` / `business[<key>]` query parameters.
///
/// # Example
///
/// ```rust
/// use braintree_oauth::ConnectUrlRequest;
///
/// let request = ConnectUrlRequest::new()
///     .with_redirect_uri("https://app.example.com/oauth/callback")
///     .with_scope("read_write")
///     .with_state("csrf-token")
///     .with_user("email", "owner@example.com")
///     .with_payment_method("credit_card");
/// assert_eq!(request.scope(), Some("read_write"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectUrlRequest {
    merchant_id: Option<String>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    state: Option<String>,
    landing_page: Option<String>,
    login_only: Option<bool>,
    user: IndexMap<String, String>,
    business: IndexMap<String, String>,
    payment_methods: Vec<String>,
}

impl ConnectUrlRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the merchant id of the partner application.
    #[must_use]
    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    /// Sets where the merchant is sent back with the authorization code.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the requested scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets an opaque value echoed back on the redirect.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Selects the first page shown, `"login"` or `"signup"`.
    #[must_use]
    pub fn with_landing_page(mut self, landing_page: impl Into<String>) -> Self {
        self.landing_page = Some(landing_page.into());
        self
    }

    /// Hides the signup option.
    #[must_use]
    pub fn with_login_only(mut self, login_only: bool) -> Self {
        self.login_only = Some(login_only);
        self
    }

    /// Prefills a field of the merchant user.
    #[must_use]
    pub fn with_user(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user.insert(key.into(), value.into());
        self
    }

    /// Prefills a field of the merchant business.
    #[must_use]
    pub fn with_business(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.business.insert(key.into(), value.into());
        self
    }

    /// Adds a payment method the merchant is asked to enable.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_methods.push(payment_method.into());
        self
    }

    /// Returns the requested scope.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Appends the query string to `url`.
    pub(crate) fn apply(&self, client_id: &str, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", client_id);

        let optional = [
            ("merchant_id", self.merchant_id.as_deref()),
            ("redirect_uri", self.redirect_uri.as_deref()),
            ("scope", self.scope.as_deref()),
            ("state", self.state.as_deref()),
            ("landing_page", self.landing_page.as_deref()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                query.append_pair(key, value);
            }
        }
        if let Some(login_only) = self.login_only {
            query.append_pair("login_only", if login_only { "true" } else { "false" });
        }

        for (key, value) in &self.user {
            query.append_pair(&format!("user[{key}]"), value);
        }
        for (key, value) in &self.business {
            query.append_pair(&format!("business[{key}]"), value);
        }
        for payment_method in &self.payment_methods {
            query.append_pair("payment_methods[]", payment_method);
        }
    }
}
