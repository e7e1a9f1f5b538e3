// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Default to "none" mode for local development
// Decision: Tokens are issued elsewhere; this service only verifies them
// Decision: jwt mode refuses to start without AUTH_JWT_SECRET

use std::time::Duration;
use taskdeck_core::{Error, Result};

/// Authentication mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication required for HTTP routes (local development)
    #[default]
    None,
    /// Bearer JWT required on every HTTP route
    Jwt,
}

impl AuthMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "jwt" => AuthMode::Jwt,
            _ => AuthMode::None,
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Access token lifetime, used when minting tokens for tests and tools
    pub access_token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_lifetime: Duration::from_secs(15 * 60), // 15 minutes
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mode = std::env::var("AUTH_MODE")
            .map(|s| AuthMode::parse(&s))
            .unwrap_or_default();

        let secret = resolve_secret(&mode, std::env::var("AUTH_JWT_SECRET").ok())?;

        let access_token_lifetime = std::env::var("AUTH_ACCESS_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(15 * 60));

        Ok(Self {
            mode,
            jwt: JwtConfig {
                secret,
                access_token_lifetime,
            },
        })
    }

    /// Config with a fixed secret, used by tests and tools
    pub fn with_secret(mode: AuthMode, secret: impl Into<String>) -> Self {
        Self {
            mode,
            jwt: JwtConfig {
                secret: secret.into(),
                ..JwtConfig::default()
            },
        }
    }

    /// Check if authentication is enabled
    pub fn is_enabled(&self) -> bool {
        self.mode != AuthMode::None
    }
}

/// Signing secret for the mode: required in jwt mode, random per process otherwise
fn resolve_secret(mode: &AuthMode, configured: Option<String>) -> Result<String> {
    if let Some(secret) = configured.filter(|s| !s.trim().is_empty()) {
        return Ok(secret);
    }
    match mode {
        AuthMode::Jwt => Err(Error::config("AUTH_JWT_SECRET must be set when AUTH_MODE=jwt")),
        AuthMode::None => {
            use rand::Rng;
            let bytes: [u8; 32] = rand::thread_rng().gen();
            Ok(hex::encode(bytes))
        }
    }
}
