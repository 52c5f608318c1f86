//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `storefront.toml`, then `STOREFRONT__<SECTION>__<KEY>` environment
//! variables (for example `STOREFRONT__SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use media::UploadConfig;
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds before an unfinished request is answered with 408
    pub request_timeout_secs: u64,
    /// Comma-separated allowed origins; empty or `*` allows any origin
    pub cors_origins: String,
    /// Apply pending migrations at startup when the database is reachable
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            cors_origins: String::new(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Explicit origins, or `None` when any origin is allowed
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

/// Token signing and bootstrap credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret, required when no RSA key pair is configured
    pub jwt_secret: String,
    /// RSA private key (PEM or path to a PEM file)
    pub jwt_private_key: Option<String>,
    /// RSA public key (PEM or path to a PEM file)
    pub jwt_public_key: Option<String>,
    /// Token lifetime in seconds (default: 24 hours)
    pub token_expiry_secs: u64,
    /// Bootstrap admin email
    pub admin_email: Option<String>,
    /// Bootstrap admin password
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_private_key: None,
            jwt_public_key: None,
            token_expiry_secs: 86_400,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AuthConfig {
    /// Bootstrap admin credentials, when both are set
    pub fn bootstrap_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load the configuration from `storefront.toml` (optional) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("storefront").required(false))
            .add_source(
                Environment::with_prefix("STOREFRONT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_defaults_without_sources() {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.auth.token_expiry_secs, 86_400);
        assert_eq!(config.uploads.public_prefix, "/uploads");
        assert!(config.auth.bootstrap_credentials().is_none());
        assert!(config.auth.jwt_secret.is_empty());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            env::set_var("STOREFRONT__SERVER__PORT", "8081");
            env::set_var("STOREFRONT__AUTH__ADMIN_EMAIL", "owner@example.com");
            env::set_var("STOREFRONT__AUTH__ADMIN_PASSWORD", "harbour-fresh-42");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(
            config.auth.bootstrap_credentials(),
            Some(("owner@example.com", "harbour-fresh-42"))
        );

        unsafe {
            env::remove_var("STOREFRONT__SERVER__PORT");
            env::remove_var("STOREFRONT__AUTH__ADMIN_EMAIL");
            env::remove_var("STOREFRONT__AUTH__ADMIN_PASSWORD");
        }
    }

    #[test]
    fn test_allowed_origins() {
        let mut server = ServerConfig::default();
        assert_eq!(server.allowed_origins(), None);

        server.cors_origins = "https://shop.example.com, https://admin.example.com".to_string();
        assert_eq!(
            server.allowed_origins(),
            Some(vec![
                "https://shop.example.com".to_string(),
                "https://admin.example.com".to_string()
            ])
        );

        server.cors_origins = "*".to_string();
        assert_eq!(server.allowed_origins(), None);
    }
}
