// Configuration loading
//
// Everything is read from environment variables (a `.env` file is loaded
// first by the binary). Each section has a `from_env` constructor and a
// `Default` that matches local development.

pub mod server;
pub mod smtp;

pub use server::ServerConfig;
pub use smtp::SmtpConfig;

/// Parse a boolean env value ("true"/"1"/"yes", case-insensitive)
pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Read an env var, treating empty values as unset
pub(crate) fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
