//! Zoom API authentication
//!
//! Two credential shapes are supported:
//! - API key/secret: a short-lived HS256 token signed locally
//! - Server-to-server OAuth: an `account_credentials` grant against the
//!   token endpoint using HTTP Basic client authentication
//!
//! Tokens are cached and regenerated shortly before they expire.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use regbridge_domain::constants::{JWT_VALIDITY_SECS, TOKEN_EXPIRY_SKEW_SECS};
use regbridge_domain::{Credentials, RegBridgeError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// A bearer token and the moment it stops being accepted.
#[derive(Clone)]
pub struct AuthContext {
    pub bearer: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Still usable, leaving `skew` for the request to complete.
    pub fn is_fresh(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew < self.expires_at
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("bearer", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Obtain a new token, ignoring any cached one.
    async fn authenticate(&self) -> Result<AuthContext>;

    /// Get a valid access token, regenerating it when close to expiry.
    async fn access_token(&self) -> Result<String>;
}

/// Single cached [`AuthContext`].
#[derive(Default)]
struct TokenCache {
    current: Mutex<Option<AuthContext>>,
}

impl TokenCache {
    async fn get_or_refresh<P>(&self, provider: &P) -> Result<String>
    where
        P: AccessTokenProvider + ?Sized,
    {
        let mut current = self.current.lock().await;
        let skew = Duration::seconds(TOKEN_EXPIRY_SKEW_SECS);

        if let Some(ctx) = current.as_ref().filter(|ctx| ctx.is_fresh(Utc::now(), skew)) {
            return Ok(ctx.bearer.clone());
        }

        debug!("zoom access token missing or near expiry; regenerating");
        let ctx = provider.authenticate().await?;
        let bearer = ctx.bearer.clone();
        *current = Some(ctx);
        Ok(bearer)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    iss: String,
    exp: i64,
}

/// Signs `{iss: api_key, exp: now + 120s}` with the API secret.
pub struct JwtTokenProvider {
    api_key: String,
    api_secret: String,
    cache: TokenCache,
}

impl JwtTokenProvider {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), api_secret: api_secret.into(), cache: TokenCache::default() }
    }
}

#[async_trait]
impl AccessTokenProvider for JwtTokenProvider {
    async fn authenticate(&self) -> Result<AuthContext> {
        let expires_at = Utc::now() + Duration::seconds(JWT_VALIDITY_SECS);
        let claims = JwtClaims { iss: self.api_key.clone(), exp: expires_at.timestamp() };

        let bearer = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| RegBridgeError::from(InfraError::from(e)))?;

        Ok(AuthContext { bearer, expires_at })
    }

    async fn access_token(&self) -> Result<String> {
        self.cache.get_or_refresh(self).await
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Server-to-server OAuth (`grant_type=account_credentials`).
pub struct OAuthTokenProvider {
    http: HttpClient,
    token_url: String,
    account_id: String,
    client_id: String,
    client_secret: String,
    cache: TokenCache,
}

impl OAuthTokenProvider {
    pub fn new(
        http: HttpClient,
        token_url: impl Into<String>,
        account_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            account_id: account_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cache: TokenCache::default(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for OAuthTokenProvider {
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn authenticate(&self) -> Result<AuthContext> {
        let request = self
            .http
            .request(Method::POST, &self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "account_credentials"), ("account_id", self.account_id.as_str())]);

        let response = self.http.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "zoom token exchange rejected");
            return Err(RegBridgeError::RemoteAuth(format!(
                "Token request failed ({status}): {error_text}"
            )));
        }

        let token: OAuthTokenResponse = response.json().await.map_err(|e| {
            RegBridgeError::RemoteAuth(format!("Failed to parse token response: {e}"))
        })?;

        info!(expires_in = token.expires_in, "obtained zoom access token");

        Ok(AuthContext {
            bearer: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    async fn access_token(&self) -> Result<String> {
        self.cache.get_or_refresh(self).await
    }
}

/// Build the provider matching the stored credentials.
///
/// # Errors
/// `Credential` naming the first component that is missing or blank.
pub fn token_provider_for(
    credentials: &Credentials,
    http: HttpClient,
    token_url: &str,
) -> Result<Arc<dyn AccessTokenProvider>> {
    match credentials {
        Credentials::ApiKey { api_key, api_secret } => {
            let api_key = required(api_key, "API Key")?;
            let api_secret = required(api_secret, "API Secret")?;
            Ok(Arc::new(JwtTokenProvider::new(api_key, api_secret)))
        }
        Credentials::OAuth { account_id, client_id, client_secret } => {
            let account_id = required(account_id, "Account ID")?;
            let client_id = required(client_id, "Client ID")?;
            let client_secret = required(client_secret, "Client Secret")?;
            Ok(Arc::new(OAuthTokenProvider::new(
                http,
                token_url,
                account_id,
                client_id,
                client_secret,
            )))
        }
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string).ok_or_else(|| {
        RegBridgeError::Credential(format!(
            "No Zoom {name} provided. Please set {name} from Zoom Settings under settings"
        ))
    })
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Clone)]
    struct MockAuthProvider {
        token: String,
    }

    #[async_trait]
    impl AccessTokenProvider for MockAuthProvider {
        async fn authenticate(&self) -> Result<AuthContext> {
            Ok(AuthContext {
                bearer: self.token.clone(),
                expires_at: Utc::now() + Duration::seconds(60),
            })
        }

        async fn access_token(&self) -> Result<String> {
            Ok(self.token.clone())
        }
    }

    #[tokio::test]
    async fn test_mock_auth_provider() {
        let provider = MockAuthProvider { token: "test-token".to_string() };

        let token = provider.access_token().await.unwrap();
        assert_eq!(token, "test-token");
    }

    #[tokio::test]
    async fn jwt_claims_carry_key_and_short_expiry() {
        let provider = JwtTokenProvider::new("my-key", "my-secret");
        let ctx = provider.authenticate().await.unwrap();

        let decoded = decode::<JwtClaims>(
            &ctx.bearer,
            &DecodingKey::from_secret(b"my-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.iss, "my-key");
        let lifetime = decoded.claims.exp - Utc::now().timestamp();
        assert!((110..=120).contains(&lifetime), "lifetime was {lifetime}");
    }

    #[tokio::test]
    async fn jwt_token_is_reused_while_fresh() {
        let provider = JwtTokenProvider::new("my-key", "my-secret");

        let first = provider.access_token().await.unwrap();
        let second = provider.access_token().await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn context_goes_stale_inside_skew() {
        let now = Utc::now();
        let ctx = AuthContext { bearer: "t".into(), expires_at: now + Duration::seconds(20) };

        assert!(ctx.is_fresh(now, Duration::seconds(10)));
        assert!(!ctx.is_fresh(now, Duration::seconds(30)));
        assert!(format!("{ctx:?}").contains("<redacted>"));
    }

    #[tokio::test]
    async fn oauth_exchanges_account_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            // base64("cid:csecret")
            .and(header("authorization", "Basic Y2lkOmNzZWNyZXQ="))
            .and(body_string_contains("grant_type=account_credentials"))
            .and(body_string_contains("account_id=acc-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "oauth-token",
                "token_type": "bearer",
                "expires_in": 3599,
                "scope": "meeting:read"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OAuthTokenProvider::new(
            HttpClient::new().unwrap(),
            format!("{}/oauth/token", server.uri()),
            "acc-1",
            "cid",
            "csecret",
        );

        assert_eq!(provider.access_token().await.unwrap(), "oauth-token");
        // cached: the mock expects exactly one exchange
        assert_eq!(provider.access_token().await.unwrap(), "oauth-token");
    }

    #[tokio::test]
    async fn oauth_rejection_is_remote_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "reason": "Invalid client_id or client_secret",
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let provider =
            OAuthTokenProvider::new(HttpClient::new().unwrap(), server.uri(), "acc", "bad", "bad");

        let err = provider.authenticate().await.unwrap_err();
        match err {
            RegBridgeError::RemoteAuth(msg) => assert!(msg.contains("invalid_client")),
            other => panic!("expected remote auth error, got {other:?}"),
        }
    }

    #[test]
    fn missing_components_are_credential_errors() {
        let http = HttpClient::new().unwrap();

        let no_secret = Credentials::ApiKey { api_key: Some("k".into()), api_secret: None };
        let err = token_provider_for(&no_secret, http.clone(), "unused").err().unwrap();
        assert_eq!(
            err,
            RegBridgeError::Credential(
                "No Zoom API Secret provided. Please set API Secret from Zoom Settings under settings"
                    .into()
            )
        );

        let blank_account = Credentials::OAuth {
            account_id: Some("   ".into()),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
        };
        let err = token_provider_for(&blank_account, http.clone(), "unused").err().unwrap();
        assert!(matches!(err, RegBridgeError::Credential(msg) if msg.contains("Account ID")));

        let complete = Credentials::ApiKey { api_key: Some("k".into()), api_secret: Some("s".into()) };
        assert!(token_provider_for(&complete, http, "unused").is_ok());
    }
}
