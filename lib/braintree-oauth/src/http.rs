use std::sync::Arc;

use http::StatusCode;
use http::header::{ACCEPT, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, truncate_body};
use crate::result::{ErrorResponse, GatewayResult};
use crate::validation::ValidationErrors;

/// Gateway API version sent with every request.
const API_VERSION: &str = "6";

const USER_AGENT_VALUE: &str = concat!("Braintree Rust ", env!("CARGO_PKG_VERSION"));

/// Body of a 422 response.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorEnvelope {
    api_error_response: ApiErrorResponse,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: ValidationErrors,
}

/// Sends requests to the gateway and sorts the answers into the two
/// outcome channels.
#[derive(Debug, Clone)]
pub(crate) struct Http {
    config: Arc<GatewayConfig>,
}

impl Http {
    pub(crate) fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub(crate) fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// POSTs a JSON body to a gateway path.
    pub(crate) async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<GatewayResult<T>, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url_for(path)?;
        let (auth_name, auth_value) = self.config.credentials.to_header()?;

        let request = self
            .config
            .http_client
            .post(url)
            .header(auth_name, auth_value)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header("X-ApiVersion", HeaderValue::from_static(API_VERSION))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .json(body)
            .build()?;

        debug!(method = %request.method(), url = %request.url(), "sending...");
        let response = self.config.http_client.execute(request).await?;
        let status = response.status();
        debug!(%status, "...receiving");

        let text = response.text().await?;
        Self::handle_response(status, &text)
    }

    fn handle_response<T>(status: StatusCode, body: &str) -> Result<GatewayResult<T>, GatewayError>
    where
        T: DeserializeOwned,
    {
        if status.is_success() {
            let target = serde_json::from_str::<T>(body)
                .map_err(|err| unexpected_response(status, err.to_string(), body))?;
            return Ok(GatewayResult::Success(target));
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let ApiErrorEnvelope {
                api_error_response: ApiErrorResponse { message, errors },
            } = serde_json::from_str(body)
                .map_err(|err| unexpected_response(status, err.to_string(), body))?;
            debug!(%message, count = errors.deep_size(), "validation failure");
            return ErrorResponse::new(message, errors)
                .map(GatewayResult::Failure)
                .ok_or_else(|| {
                    unexpected_response(status, "validation failure without errors".into(), body)
                });
        }

        let error = GatewayError::from_status(status, body);
        if status == StatusCode::UNAUTHORIZED {
            warn!(%status, "gateway rejected the credentials");
        } else {
            debug!(%status, %error, "gateway error");
        }
        Err(error)
    }
}

fn unexpected_response(status: StatusCode, reason: String, body: &str) -> GatewayError {
    GatewayError::UnexpectedResponse {
        status_code: status.as_u16(),
        reason,
        body: truncate_body(body),
    }
}
