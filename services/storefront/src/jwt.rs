//! JWT service for token generation and validation
//!
//! Tokens are signed with RS256 when an RSA key pair is configured, and with
//! HS256 over the shared secret otherwise.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{AuthUser, Role};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a JWT service from the auth configuration
    pub fn new(config: &AuthConfig) -> Result<Self> {
        match (&config.jwt_private_key, &config.jwt_public_key) {
            (Some(private_key), Some(public_key)) => {
                let private_key = read_pem(private_key)?;
                let public_key = read_pem(public_key)?;
                info!("Signing tokens with RS256");

                Ok(Self::with_keys(
                    Algorithm::RS256,
                    EncodingKey::from_rsa_pem(private_key.as_bytes())?,
                    DecodingKey::from_rsa_pem(public_key.as_bytes())?,
                    config.token_expiry_secs,
                ))
            }
            _ => {
                if config.jwt_secret.trim().is_empty() {
                    anyhow::bail!("auth.jwt_secret must be set when no RSA key pair is configured");
                }
                Ok(Self::from_secret(&config.jwt_secret, config.token_expiry_secs))
            }
        }
    }

    /// HS256 service over a shared secret
    pub fn from_secret(secret: &str, token_expiry: u64) -> Self {
        Self::with_keys(
            Algorithm::HS256,
            EncodingKey::from_secret(secret.as_bytes()),
            DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        )
    }

    fn with_keys(
        algorithm: Algorithm,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        token_expiry: u64,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;

        Self {
            algorithm,
            encoding_key,
            decoding_key,
            validation,
            token_expiry,
        }
    }

    /// Generate an access token
    pub fn generate_token(&self, id: Uuid, email: &str, role: Role) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.token_expiry,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}

/// Inline PEM, or a path to a PEM file (tried from the working directory,
/// then the crate root)
fn read_pem(value: &str) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    let pem = std::fs::read_to_string(value)
        .or_else(|_| {
            let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path.push(value);
            std::fs::read_to_string(path)
        })
        .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", value, e))?;

    Ok(pem.trim().to_string())
}
