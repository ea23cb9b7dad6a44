use super::model::AuthenticatedUser;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

/// Where signature verification keys come from
enum KeySource {
    /// RS256 keys published by the issuer, selected by `kid`
    Jwks(Arc<JwksClient>),
    /// HS256 shared secret
    Secret(DecodingKey),
}

pub struct JwtValidator {
    keys: KeySource,
    issuer: Option<String>,
    audience: Option<String>,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    // exp/nbf/iss/aud are checked by jsonwebtoken itself
    #[serde(default)]
    roles: Vec<String>,
}

impl JwtValidator {
    pub fn with_jwks(
        jwks_client: Arc<JwksClient>,
        issuer: Option<String>,
        audience: Option<String>,
        leeway: Duration,
    ) -> Self {
        Self {
            keys: KeySource::Jwks(jwks_client),
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn with_secret(
        secret: &[u8],
        issuer: Option<String>,
        audience: Option<String>,
        leeway: Duration,
    ) -> Self {
        Self {
            keys: KeySource::Secret(DecodingKey::from_secret(secret)),
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    /// A configured shared secret wins over JWKS.
    pub fn from_config(config: &AuthConfig) -> Result<Self, String> {
        if let Some(secret) = &config.jwt_secret {
            return Ok(Self::with_secret(
                secret.as_bytes(),
                config.issuer.clone(),
                config.audience.clone(),
                config.jwt_leeway,
            ));
        }

        let issuer = config
            .issuer
            .clone()
            .ok_or_else(|| "AUTH_ISSUER is required when AUTH_JWT_SECRET is not set".to_string())?;
        let jwks_url = config
            .jwks_url
            .clone()
            .unwrap_or_else(|| format!("{}/jwks", issuer.trim_end_matches('/')));

        Ok(Self::with_jwks(
            Arc::new(JwksClient::new(jwks_url, config.jwks_cache_ttl)),
            Some(issuer),
            config.audience.clone(),
            config.jwt_leeway,
        ))
    }

    /// Human-readable verification mode for start-up logging
    pub fn mode(&self) -> String {
        match &self.keys {
            KeySource::Jwks(client) => format!("RS256 via JWKS ({})", client.jwks_url()),
            KeySource::Secret(_) => "HS256 shared secret".to_string(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let (algorithm, decoding_key) = match &self.keys {
            KeySource::Jwks(client) => {
                let kid = header
                    .kid
                    .as_deref()
                    .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;
                let key = client.get_key(kid).await?;
                (Algorithm::RS256, key)
            }
            KeySource::Secret(key) => (Algorithm::HS256, key.clone()),
        };

        if header.alg != algorithm {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only {:?} is allowed",
                header.alg, algorithm
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(AuthenticatedUser {
            sub: token_data.claims.sub,
            roles: token_data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{mint_token, mint_token_with, test_validator, TEST_JWT_SECRET};
    use base64::Engine;
    use serde_json::json;

    #[tokio::test]
    async fn test_valid_token_yields_user() {
        let validator = test_validator();
        let user = validator
            .validate_token(&mint_token("user-123"))
            .await
            .unwrap();

        assert_eq!(user.sub, "user-123");
        assert_eq!(user.roles, vec!["editor".to_string()]);
    }

    #[tokio::test]
    async fn test_unreachable_jwks_is_internal_error() {
        let validator = JwtValidator::with_jwks(
            Arc::new(JwksClient::new(
                "http://127.0.0.1:9/jwks",
                Duration::from_secs(60),
            )),
            None,
            None,
            Duration::from_secs(0),
        );
        let header = jsonwebtoken::Header {
            kid: Some("key-1".to_string()),
            ..jsonwebtoken::Header::new(Algorithm::RS256)
        };
        // Never verified: the key lookup fails before the signature is checked
        let token = format!(
            "{}.e30.c2ln",
            base64::prelude::BASE64_URL_SAFE_NO_PAD
                .encode(serde_json::to_vec(&header).unwrap())
        );

        let err = validator.validate_token(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let validator = test_validator();
        let now = chrono::Utc::now().timestamp();
        let token = mint_token_with(
            json!({ "sub": "user-123", "exp": now - 3600 }),
            TEST_JWT_SECRET,
        );

        let err = validator.validate_token(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let validator = test_validator();
        let now = chrono::Utc::now().timestamp();
        let token = mint_token_with(
            json!({ "sub": "user-123", "exp": now + 3600 }),
            b"some-other-secret",
        );

        assert!(validator.validate_token(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_audience_enforced_when_configured() {
        let validator = JwtValidator::with_secret(
            TEST_JWT_SECRET,
            None,
            Some("world-cities".to_string()),
            Duration::from_secs(0),
        );
        let now = chrono::Utc::now().timestamp();

        let wrong = mint_token_with(
            json!({ "sub": "u", "exp": now + 3600, "aud": "someone-else" }),
            TEST_JWT_SECRET,
        );
        assert!(validator.validate_token(&wrong).await.is_err());

        let right = mint_token_with(
            json!({ "sub": "u", "exp": now + 3600, "aud": "world-cities" }),
            TEST_JWT_SECRET,
        );
        assert!(validator.validate_token(&right).await.is_ok());
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let validator = test_validator();
        let err = validator.validate_token("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_from_config_prefers_secret() {
        let config = AuthConfig {
            issuer: Some("https://auth.example.com/oidc".to_string()),
            audience: None,
            jwt_secret: Some("s3cret".to_string()),
            jwks_url: None,
            jwks_cache_ttl: Duration::from_secs(60),
            jwt_leeway: Duration::from_secs(60),
        };
        let validator = JwtValidator::from_config(&config).unwrap();
        assert_eq!(validator.mode(), "HS256 shared secret");
    }

    #[test]
    fn test_from_config_derives_jwks_url_from_issuer() {
        let config = AuthConfig {
            issuer: Some("https://auth.example.com/oidc/".to_string()),
            audience: None,
            jwt_secret: None,
            jwks_url: None,
            jwks_cache_ttl: Duration::from_secs(60),
            jwt_leeway: Duration::from_secs(60),
        };
        let validator = JwtValidator::from_config(&config).unwrap();
        assert_eq!(
            validator.mode(),
            "RS256 via JWKS (https://auth.example.com/oidc/jwks)"
        );
    }
}
