// JWT verification for HTTP requests and WebSocket handshakes
// Decision: Use HS256 algorithm (symmetric key shared with the issuing service)
// Decision: Subject is read from `sub`, falling back to `id` for older issuers

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::JwtConfig;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Legacy subject field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Token type; when present it must be "access"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl AccessTokenClaims {
    /// User id carried by the token
    pub fn user_id(&self) -> Result<Uuid> {
        let subject = self
            .sub
            .as_deref()
            .or(self.id.as_deref())
            .context("Token has no subject")?;
        Uuid::parse_str(subject).context("Invalid user ID in token")
    }
}

/// JWT service for token validation (and minting, for tools and tests)
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate access token for a user
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
        roles: &[String],
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::from_std(self.config.access_token_lifetime)?;

        let claims = AccessTokenClaims {
            sub: Some(user_id.to_string()),
            id: None,
            email: Some(email.to_string()),
            name: Some(name.to_string()),
            roles: roles.to_vec(),
            token_type: Some("access".to_string()),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode access token")
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .context("Invalid access token")?;

        if let Some(token_type) = &token_data.claims.token_type {
            if token_type != "access" {
                anyhow::bail!("Invalid token type");
            }
        }

        Ok(token_data.claims)
    }

    /// Validate a token and return the user id it carries
    pub fn authenticate(&self, token: &str) -> Result<(Uuid, AccessTokenClaims)> {
        let claims = self.validate_access_token(token)?;
        let user_id = claims.user_id()?;
        Ok((user_id, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_lifetime: StdDuration::from_secs(900),
        }
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = JwtService::new(test_config());
        let user_id = Uuid::now_v7();
        let token = service
            .generate_access_token(user_id, "jo@example.com", "Jo", &["user".to_string()])
            .unwrap();

        let (id, claims) = service.authenticate(&token).unwrap();
        assert_eq!(id, user_id);
        assert_eq!(claims.email.as_deref(), Some("jo@example.com"));
        assert_eq!(claims.roles, vec!["user".to_string()]);
    }

    #[test]
    fn test_legacy_id_claim() {
        let service = JwtService::new(test_config());
        let user_id = Uuid::now_v7();
        let token = sign(
            &serde_json::json!({
                "id": user_id.to_string(),
                "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
            }),
            "test-secret-key-for-testing",
        );

        let (id, _) = service.authenticate(&token).unwrap();
        assert_eq!(id, user_id);
    }

    #[test]
    fn test_missing_subject_rejected() {
        let service = JwtService::new(test_config());
        let token = sign(
            &serde_json::json!({ "exp": (Utc::now() + Duration::minutes(5)).timestamp() }),
            "test-secret-key-for-testing",
        );

        assert!(service.validate_access_token(&token).is_ok());
        assert!(service.authenticate(&token).is_err());
    }

    #[test]
    fn test_invalid_and_foreign_tokens() {
        let service = JwtService::new(test_config());
        assert!(service.validate_access_token("invalid-token").is_err());

        let foreign = sign(
            &serde_json::json!({
                "sub": Uuid::now_v7().to_string(),
                "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
            }),
            "another-secret",
        );
        assert!(service.validate_access_token(&foreign).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(test_config());
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::now_v7().to_string(),
                "exp": (Utc::now() - Duration::hours(1)).timestamp(),
            }),
            "test-secret-key-for-testing",
        );
        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type() {
        let service = JwtService::new(test_config());
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::now_v7().to_string(),
                "token_type": "refresh",
                "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
            }),
            "test-secret-key-for-testing",
        );
        assert!(service.validate_access_token(&token).is_err());
    }
}
