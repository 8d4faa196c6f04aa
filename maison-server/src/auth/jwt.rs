//! JWT Service
//!
//! HS256 verification with issuer/audience checks. Expiry maps to its own
//! error so clients can distinguish "log in again" from "bad token".

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in seconds
    pub ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "maison-server".to_string(),
            audience: "maison-client".to_string(),
            ttl_secs: 24 * 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record id (`user:…`)
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn generate_token(&self, user_id: &str, username: &str, role: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now,
            exp: now + self.config.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::invalid_token(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn round_trip() {
        let svc = service();
        let token = svc
            .generate_token("user:ada", "ada", "customer")
            .expect("token");
        let claims = svc.verify_token(&token).expect("claims");
        assert_eq!(claims.sub, "user:ada");
        assert_eq!(claims.role, "customer");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service()
            .generate_token("user:ada", "ada", "customer")
            .expect("token");
        let other = JwtService::new(JwtConfig {
            secret: "different".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            other.verify_token(&token),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_maps_to_token_expired() {
        let svc = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ttl_secs: -3600,
            ..Default::default()
        });
        let token = svc
            .generate_token("user:ada", "ada", "customer")
            .expect("token");
        assert!(matches!(
            svc.verify_token(&token),
            Err(AppError::TokenExpired)
        ));
    }
}
