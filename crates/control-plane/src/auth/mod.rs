// Authentication module
// Decision: Verification only; login, refresh and OAuth live in the issuing service

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, AuthMode, JwtConfig};
pub use jwt::{AccessTokenClaims, JwtService};
pub use middleware::{bearer_token, AdminUser, AuthError, AuthMethod, AuthState, AuthUser, FromRef};
