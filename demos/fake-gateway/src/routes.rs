use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::config::ServerConfig;
use crate::errors::{ApiError, FieldError, OAUTH_INVALID_REQUEST, OAUTH_UNSUPPORTED_GRANT_TYPE};
use crate::extractors::{ClientAuth, MerchantAuth};
use crate::store::{NewCustomer, TokenStore};

/// The application router
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/oauth_testing/grants", post(create_grant))
        .route("/oauth/access_tokens", post(create_access_token))
        .route("/oauth/revoke_access_token", post(revoke_access_token))
        .route("/merchants/{merchant_id}/customers", post(create_customer))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.uptime();

    Json(json!({
        "status": "OK",
        "uptime": uptime,
    }))
}

#[derive(Debug, Deserialize)]
struct GrantRequest {
    merchant_public_id: String,
    #[serde(default = "default_scope")]
    scope: String,
}

fn default_scope() -> String {
    "read_write".to_string()
}

async fn create_grant(
    _: ClientAuth,
    State(store): State<TokenStore>,
    Json(request): Json<GrantRequest>,
) -> impl IntoResponse {
    let GrantRequest {
        merchant_public_id,
        scope,
    } = request;
    info!(%merchant_public_id, %scope, "creating grant");
    let code = store.create_grant(merchant_public_id, scope).await;

    (StatusCode::CREATED, Json(json!({ "grant": { "code": code } })))
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    credentials: GrantParams,
}

#[derive(Debug, Deserialize)]
struct GrantParams {
    grant_type: String,
    code: Option<String>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

async fn create_access_token(
    _: ClientAuth,
    State(config): State<Arc<ServerConfig>>,
    State(store): State<TokenStore>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let GrantParams {
        grant_type,
        code,
        refresh_token,
        scope,
    } = request.credentials;

    let issued = match (grant_type.as_str(), code, refresh_token) {
        ("authorization_code", Some(code), _) => {
            store.exchange_code(&code, scope.as_deref()).await?
        }
        ("refresh_token", _, Some(refresh_token)) => {
            store
                .exchange_refresh_token(&refresh_token, scope.as_deref(), config.refresh_rotation)
                .await?
        }
        ("authorization_code" | "refresh_token", _, _) => {
            return Err(ApiError::validation(
                "credentials",
                FieldError::new("grant_type", OAUTH_INVALID_REQUEST, "Invalid request"),
            ));
        }
        _ => {
            return Err(ApiError::validation(
                "credentials",
                FieldError::new(
                    "grant_type",
                    OAUTH_UNSUPPORTED_GRANT_TYPE,
                    "Unsupported grant type",
                ),
            ));
        }
    };

    Ok((StatusCode::CREATED, Json(json!({ "credentials": issued }))))
}

#[derive(Debug, Deserialize)]
struct RevokeRequest {
    token: String,
}

async fn revoke_access_token(
    _: ClientAuth,
    State(config): State<Arc<ServerConfig>>,
    State(store): State<TokenStore>,
    Json(request): Json<RevokeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let success = store
        .revoke(&request.token, config.revocation_replay)
        .await?;

    Ok(Json(json!({ "result": { "success": success } })))
}

#[derive(Debug, Deserialize)]
struct CustomerRequest {
    customer: NewCustomer,
}

async fn create_customer(
    auth: MerchantAuth,
    Path(merchant_id): Path<String>,
    State(store): State<TokenStore>,
    Json(request): Json<CustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if auth.merchant_id != merchant_id {
        return Err(ApiError::Forbidden { merchant_id });
    }
    let customer = store.create_customer(&merchant_id, request.customer).await?;

    Ok((StatusCode::CREATED, Json(json!({ "customer": customer }))))
}
