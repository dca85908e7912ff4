#![allow(missing_docs)]

use braintree_oauth::oauth::BEARER;
use braintree_oauth::{
    CustomerRequest, GatewayError, GatewayResult, OAuthCredentials, OAuthCredentialsRequest,
    ValidationErrorCode,
};
use fake_gateway::{RefreshRotation, RevocationReplay, ServerConfig};
use rstest::rstest;
use tracing::info;

mod common;
pub use self::common::*;

async fn exchange_code(app: &TestApp) -> anyhow::Result<OAuthCredentials> {
    let code = app.create_grant(MERCHANT_ID, "read_write").await?;
    let request = OAuthCredentialsRequest::from_code(code).with_scope("read_write");

    let credentials = app
        .oauth()
        .create_token_from_code(&request)
        .await?
        .into_result()?;
    Ok(credentials)
}

#[rstest]
#[tokio::test]
async fn test_create_token_from_code(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let code = app.create_grant(MERCHANT_ID, "read_write").await?;
    let request = OAuthCredentialsRequest::from_code(code).with_scope("read_write");
    let result = app.oauth().create_token_from_code(&request).await?;

    assert!(result.is_success());
    let credentials = result.target().expect("credentials");
    assert!(!credentials.access_token().is_empty());
    assert!(!credentials.refresh_token().is_empty());
    assert!(!credentials.is_expired());
    assert_eq!(credentials.token_type(), "bearer");
    assert_eq!(credentials.scope(), Some("read_write"));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_create_token_from_refresh_token(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let first = exchange_code(&app).await?;
    let refresh_token = first.refresh_token();

    let request =
        OAuthCredentialsRequest::from_refresh_token(refresh_token).with_scope("read_write");
    let refreshed = app
        .oauth()
        .create_token_from_refresh_token(&request)
        .await?
        .into_result()?;

    assert!(!refreshed.access_token().is_empty());
    assert_ne!(refreshed.access_token(), first.access_token());
    assert!(!refreshed.refresh_token().is_empty());
    assert_ne!(refreshed.refresh_token(), refresh_token);
    assert_eq!(refreshed.token_type(), BEARER);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_create_token_from_bad_code(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let request = OAuthCredentialsRequest::from_code("bad_code").with_scope("read_write");
    let result = app.oauth().create_token_from_code(&request).await?;

    assert!(!result.is_success());
    let on_code = result.errors().for_object("Credentials").on_field("Code");
    assert_eq!(on_code.len(), 1);
    let error = on_code.first().expect("one error");
    assert_eq!(error.code(), &ValidationErrorCode::OAuthInvalidGrant);
    assert_eq!(error.message(), "Invalid grant: code not found");
    assert_eq!(result.message(), Some("Invalid grant: code not found"));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_revoke_access_token(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let credentials = exchange_code(&app).await?;

    // the token works before revocation
    let merchant = app.merchant_gateway(credentials.access_token())?;
    let customer = merchant.customer().create(&CustomerRequest::new()).await?;
    assert!(customer.is_success());

    let result = app
        .oauth()
        .revoke_access_token(credentials.access_token())
        .await?
        .into_result()?;
    assert!(result.result());

    let err = merchant
        .customer()
        .create(&CustomerRequest::new())
        .await
        .expect_err("revoked token");
    info!(%err, "revoked token rejected");
    assert!(err.is_authentication());

    Ok(())
}

#[rstest]
#[case::reject(RevocationReplay::Reject)]
#[case::acknowledge(RevocationReplay::Acknowledge)]
#[tokio::test]
async fn test_revoke_access_token_twice(#[case] replay: RevocationReplay) -> anyhow::Result<()> {
    init_tracing();
    let app = TestApp::start(ServerConfig::default().with_revocation_replay(replay)).await?;
    let credentials = exchange_code(&app).await?;

    let first = app
        .oauth()
        .revoke_access_token(credentials.access_token())
        .await?;
    assert_eq!(first.target().map(|it| it.result()), Some(true));

    let second = app
        .oauth()
        .revoke_access_token(credentials.access_token())
        .await?;
    match (replay, second) {
        (RevocationReplay::Reject, GatewayResult::Failure(failure)) => {
            let errors = failure.errors().for_object("Credentials").on_field("Token");
            assert_eq!(
                errors.first().map(|it| it.code()),
                Some(&ValidationErrorCode::OAuthInvalidGrant)
            );
        }
        (RevocationReplay::Acknowledge, GatewayResult::Success(result)) => {
            assert!(!result.result());
        }
        (replay, second) => anyhow::bail!("unexpected answer for {replay:?}: {second:?}"),
    }

    Ok(())
}

#[rstest]
#[case::rotate(RefreshRotation::Rotate, false)]
#[case::reuse(RefreshRotation::Reuse, true)]
#[tokio::test]
async fn test_refresh_token_reuse(
    #[case] rotation: RefreshRotation,
    #[case] reusable: bool,
) -> anyhow::Result<()> {
    init_tracing();
    let app = TestApp::start(ServerConfig::default().with_refresh_rotation(rotation)).await?;
    let credentials = exchange_code(&app).await?;
    let request = OAuthCredentialsRequest::from_refresh_token(credentials.refresh_token());

    let first = app.oauth().create_token_from_refresh_token(&request).await?;
    assert!(first.is_success());

    let second = app.oauth().create_token_from_refresh_token(&request).await?;
    assert_eq!(second.is_success(), reusable);
    if !reusable {
        let errors = second
            .errors()
            .for_object("Credentials")
            .on_field("RefreshToken");
        assert_eq!(errors.len(), 1);
    }

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_create_token_with_scope_not_granted(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let code = app.create_grant(MERCHANT_ID, "read_write").await?;
    let request = OAuthCredentialsRequest::from_code(code)
        .with_scopes(["read_write", "shared_vault_transactions"]);
    let result = app.oauth().create_token_from_code(&request).await?;

    let errors = result.errors().for_object("Credentials").on_field("Scope");
    assert_eq!(
        errors.first().map(|it| it.code()),
        Some(&ValidationErrorCode::OAuthInvalidScope)
    );

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_expired_token_is_rejected() -> anyhow::Result<()> {
    init_tracing();
    let config = ServerConfig::default().with_token_lifetime(jiff::SignedDuration::ZERO);
    let app = TestApp::start(config).await?;
    let credentials = exchange_code(&app).await?;
    assert!(credentials.is_expired());

    let merchant = app.merchant_gateway(credentials.access_token())?;
    let result = merchant.customer().create(&CustomerRequest::new()).await;

    assert!(matches!(result, Err(GatewayError::Authentication { .. })));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_customer_validation_failure(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let credentials = exchange_code(&app).await?;
    let merchant = app.merchant_gateway(credentials.access_token())?;

    let result = merchant
        .customer()
        .create(&CustomerRequest::new().with_email("not-an-email"))
        .await?;

    let errors = result.errors().for_object("Customer").on_field("Email");
    assert_eq!(
        errors.first().map(|it| it.code()),
        Some(&ValidationErrorCode::CustomerEmailIsInvalid)
    );

    let created = merchant
        .customer()
        .create(
            &CustomerRequest::new()
                .with_first_name("Ada")
                .with_email("ada@example.com"),
        )
        .await?
        .into_result()?;
    assert_eq!(created.first_name(), Some("Ada"));
    assert!(created.created_at().is_some());

    Ok(())
}
