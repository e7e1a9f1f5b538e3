// SMTP configuration
// Decision: Mail is only sent when both SMTP_USER and SMTP_PASS are set

use super::{env_opt, parse_bool};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Sender address
    pub from: String,
    /// Upgrade the connection with STARTTLS
    pub starttls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: None,
            password: None,
            from: "noreply@taskmanager.com".to_string(),
            starttls: true,
        }
    }
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_opt("SMTP_HOST").unwrap_or(defaults.host),
            port: env_opt("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            user: env_opt("SMTP_USER"),
            password: env_opt("SMTP_PASS"),
            from: env_opt("SMTP_FROM").unwrap_or(defaults.from),
            starttls: env_opt("SMTP_STARTTLS")
                .map(|s| parse_bool(&s))
                .unwrap_or(defaults.starttls),
        }
    }

    /// Credentials, when mail delivery is enabled
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_requires_both_credentials() {
        let mut config = SmtpConfig::default();
        assert!(!config.is_enabled());

        config.user = Some("mailer".to_string());
        assert!(!config.is_enabled());

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials(), Some(("mailer", "secret")));
    }

    #[test]
    fn test_defaults() {
        let config = SmtpConfig::default();
        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.from, "noreply@taskmanager.com");
        assert!(config.starttls);
    }
}
