use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{RefreshRotation, RevocationReplay};
use crate::errors::{
    ApiError, CUSTOMER_EMAIL_IS_INVALID, CUSTOMER_EMAIL_IS_TOO_LONG,
    CUSTOMER_FIRST_NAME_IS_TOO_LONG, CUSTOMER_LAST_NAME_IS_TOO_LONG, FieldError,
    OAUTH_INVALID_GRANT, OAUTH_INVALID_SCOPE,
};

const MAX_FIELD_LENGTH: usize = 255;

#[derive(Debug, Clone)]
struct Grant {
    merchant_id: String,
    scope: String,
}

#[derive(Debug, Clone)]
struct AccessToken {
    merchant_id: String,
    expires_at: Timestamp,
    revoked: bool,
}

/// Credentials issued by an exchange.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Issued {
    access_token: String,
    refresh_token: String,
    expires_at: Timestamp,
    token_type: &'static str,
    scope: String,
}

/// Customer fields accepted on creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NewCustomer {
    id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Customer {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    created_at: Timestamp,
}

#[derive(Debug, Default)]
struct Data {
    codes: HashMap<String, Grant>,
    refresh_tokens: HashMap<String, Grant>,
    access_tokens: HashMap<String, AccessToken>,
    customers: HashMap<String, Vec<Customer>>,
}

/// In-memory storage of grants, tokens and customers.
#[derive(Clone)]
pub(crate) struct TokenStore {
    environment: String,
    token_lifetime: SignedDuration,
    data: Arc<RwLock<Data>>,
}

impl TokenStore {
    pub(crate) fn new(environment: impl Into<String>, token_lifetime: SignedDuration) -> Self {
        Self {
            environment: environment.into(),
            token_lifetime,
            data: Arc::default(),
        }
    }

    pub(crate) async fn create_grant(&self, merchant_id: String, scope: String) -> String {
        let code = Uuid::now_v7().simple().to_string();
        let mut data = self.data.write().await;
        data.codes.insert(code.clone(), Grant { merchant_id, scope });
        code
    }

    /// Consumes an authorization code.
    pub(crate) async fn exchange_code(
        &self,
        code: &str,
        scope: Option<&str>,
    ) -> Result<Issued, ApiError> {
        let mut data = self.data.write().await;
        let grant = data
            .codes
            .get(code)
            .cloned()
            .ok_or_else(|| ApiError::invalid_grant("Invalid grant: code not found"))?;
        let scope = narrow_scope(&grant.scope, scope)?;
        data.codes.remove(code);

        self.issue(&mut data, grant.merchant_id, scope)
    }

    pub(crate) async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
        scope: Option<&str>,
        rotation: RefreshRotation,
    ) -> Result<Issued, ApiError> {
        let mut data = self.data.write().await;
        let grant = data.refresh_tokens.get(refresh_token).cloned().ok_or_else(|| {
            ApiError::validation(
                "credentials",
                FieldError::new(
                    "refresh_token",
                    OAUTH_INVALID_GRANT,
                    "Invalid grant: refresh token not found",
                ),
            )
        })?;
        let scope = narrow_scope(&grant.scope, scope)?;
        if rotation == RefreshRotation::Rotate {
            data.refresh_tokens.remove(refresh_token);
        }

        self.issue(&mut data, grant.merchant_id, scope)
    }

    /// Revokes an access token, returns `false` when the token was already revoked
    /// and the replay is acknowledged.
    pub(crate) async fn revoke(
        &self,
        token: &str,
        replay: RevocationReplay,
    ) -> Result<bool, ApiError> {
        let mut data = self.data.write().await;
        let Some(access_token) = data.access_tokens.get_mut(token) else {
            return match replay {
                RevocationReplay::Reject => Err(ApiError::validation(
                    "credentials",
                    FieldError::new(
                        "token",
                        OAUTH_INVALID_GRANT,
                        "Invalid grant: access token not found",
                    ),
                )),
                RevocationReplay::Acknowledge => Ok(false),
            };
        };

        if !access_token.revoked {
            access_token.revoked = true;
            return Ok(true);
        }
        match replay {
            RevocationReplay::Reject => Err(ApiError::validation(
                "credentials",
                FieldError::new(
                    "token",
                    OAUTH_INVALID_GRANT,
                    "Invalid grant: access token already revoked",
                ),
            )),
            RevocationReplay::Acknowledge => Ok(false),
        }
    }

    /// Returns the merchant of a live access token.
    pub(crate) async fn authenticate(&self, token: &str) -> Result<String, ApiError> {
        let data = self.data.read().await;
        match data.access_tokens.get(token) {
            Some(access_token)
                if !access_token.revoked && Timestamp::now() < access_token.expires_at =>
            {
                Ok(access_token.merchant_id.clone())
            }
            _ => Err(ApiError::Unauthenticated),
        }
    }

    pub(crate) async fn create_customer(
        &self,
        merchant_id: &str,
        customer: NewCustomer,
    ) -> Result<Customer, ApiError> {
        validate_customer(&customer)?;

        let NewCustomer {
            id,
            first_name,
            last_name,
            company,
            email,
            phone,
        } = customer;
        let customer = Customer {
            id: id.unwrap_or_else(|| Uuid::now_v7().simple().to_string()),
            first_name,
            last_name,
            company,
            email,
            phone,
            created_at: Timestamp::now(),
        };

        let mut data = self.data.write().await;
        data.customers
            .entry(merchant_id.to_string())
            .or_default()
            .push(customer.clone());
        Ok(customer)
    }

    fn issue(
        &self,
        data: &mut Data,
        merchant_id: String,
        scope: String,
    ) -> Result<Issued, ApiError> {
        let expires_at = Timestamp::now()
            .checked_add(self.token_lifetime)
            .map_err(|err| ApiError::Internal {
                reason: err.to_string(),
            })?;
        let access_token = self.token("access_token", &merchant_id);
        let refresh_token = self.token("refresh_token", &merchant_id);

        data.access_tokens.insert(
            access_token.clone(),
            AccessToken {
                merchant_id: merchant_id.clone(),
                expires_at,
                revoked: false,
            },
        );
        data.refresh_tokens.insert(
            refresh_token.clone(),
            Grant {
                merchant_id,
                scope: scope.clone(),
            },
        );

        Ok(Issued {
            access_token,
            refresh_token,
            expires_at,
            token_type: "bearer",
            scope,
        })
    }

    fn token(&self, kind: &str, merchant_id: &str) -> String {
        let environment = &self.environment;
        let hash = Uuid::now_v7().simple();
        format!("{kind}${environment}${merchant_id}${hash}")
    }
}

/// Keeps the granted scope unless a subset of it is requested.
fn narrow_scope(granted: &str, requested: Option<&str>) -> Result<String, ApiError> {
    let Some(requested) = requested else {
        return Ok(granted.to_string());
    };
    let granted = granted.split(',').map(str::trim).collect::<Vec<_>>();
    let allowed = requested
        .split(',')
        .map(str::trim)
        .all(|scope| granted.contains(&scope));
    if !allowed {
        return Err(ApiError::validation(
            "credentials",
            FieldError::new("scope", OAUTH_INVALID_SCOPE, "Invalid scope"),
        ));
    }
    Ok(requested.to_string())
}

fn validate_customer(customer: &NewCustomer) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Some(email) = &customer.email {
        if email.len() > MAX_FIELD_LENGTH {
            errors.push(FieldError::new(
                "email",
                CUSTOMER_EMAIL_IS_TOO_LONG,
                "Email is too long.",
            ));
        } else if !is_email(email) {
            errors.push(FieldError::new(
                "email",
                CUSTOMER_EMAIL_IS_INVALID,
                "Email is an invalid format.",
            ));
        }
    }
    if customer
        .first_name
        .as_ref()
        .is_some_and(|name| name.len() > MAX_FIELD_LENGTH)
    {
        errors.push(FieldError::new(
            "first_name",
            CUSTOMER_FIRST_NAME_IS_TOO_LONG,
            "First name is too long.",
        ));
    }
    if customer
        .last_name
        .as_ref()
        .is_some_and(|name| name.len() > MAX_FIELD_LENGTH)
    {
        errors.push(FieldError::new(
            "last_name",
            CUSTOMER_LAST_NAME_IS_TOO_LONG,
            "Last name is too long.",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation {
            object: "customer",
            errors,
        })
    }
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TokenStore {
        TokenStore::new("development", SignedDuration::from_hours(1))
    }

    async fn issued(store: &TokenStore) -> Issued {
        let code = store
            .create_grant("merchant".to_string(), "read_write".to_string())
            .await;
        store.exchange_code(&code, None).await.expect("valid code")
    }

    #[tokio::test]
    async fn should_consume_code_once() {
        let store = store();
        let code = store
            .create_grant("merchant".to_string(), "read_write".to_string())
            .await;

        let issued = store.exchange_code(&code, None).await.expect("first use");
        assert!(issued.access_token.starts_with("access_token$development$merchant$"));
        assert_eq!(issued.scope, "read_write");

        let err = store.exchange_code(&code, None).await.expect_err("second use");
        assert_eq!(err.to_string(), "Invalid grant: code not found");
    }

    #[tokio::test]
    async fn should_rotate_refresh_token() {
        let store = store();
        let first = issued(&store).await;

        let second = store
            .exchange_refresh_token(&first.refresh_token, None, RefreshRotation::Rotate)
            .await
            .expect("valid refresh token");
        assert_ne!(second.refresh_token, first.refresh_token);

        let reused = store
            .exchange_refresh_token(&first.refresh_token, None, RefreshRotation::Rotate)
            .await;
        assert!(reused.is_err());
    }

    #[tokio::test]
    async fn should_reject_scope_outside_grant() {
        let store = store();
        let code = store
            .create_grant("merchant".to_string(), "read_write".to_string())
            .await;

        let err = store
            .exchange_code(&code, Some("read_write,admin"))
            .await
            .expect_err("scope not granted");
        assert_eq!(err.to_string(), "Invalid scope");
        // a rejected exchange leaves the code usable
        assert!(store.exchange_code(&code, Some("read_write")).await.is_ok());
    }

    #[tokio::test]
    async fn should_revoke_access_token() {
        let store = store();
        let issued = issued(&store).await;
        assert!(store.authenticate(&issued.access_token).await.is_ok());

        let revoked = store
            .revoke(&issued.access_token, RevocationReplay::Reject)
            .await
            .expect("fresh token");
        assert!(revoked);
        assert!(store.authenticate(&issued.access_token).await.is_err());

        assert!(
            store
                .revoke(&issued.access_token, RevocationReplay::Reject)
                .await
                .is_err()
        );
        let replayed = store
            .revoke(&issued.access_token, RevocationReplay::Acknowledge)
            .await
            .expect("acknowledged");
        assert!(!replayed);
    }

    #[tokio::test]
    async fn should_validate_customer_email() {
        let store = store();
        let customer = NewCustomer {
            email: Some("not-an-email".to_string()),
            ..NewCustomer::default()
        };

        let err = store
            .create_customer("merchant", customer)
            .await
            .expect_err("invalid email");
        assert_eq!(err.to_string(), "Email is an invalid format.");
    }
}
