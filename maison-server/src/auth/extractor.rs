//! CurrentUser Extractor
//!
//! Pulls the bearer token from the `Authorization` header and verifies it
//! against the server's JWT service. Handlers that take a `CurrentUser`
//! argument are authenticated by construction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::core::ServerState;
use crate::utils::AppError;

const ADMIN_ROLE: &str = "admin";

/// Verified request identity
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User record id (`user:…`)
    pub id: String,
    pub username: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = state.jwt_service.verify_token(token)?;
        Ok(CurrentUser {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_check() {
        let admin = CurrentUser {
            id: "user:root".to_string(),
            username: "root".to_string(),
            role: "admin".to_string(),
        };
        let customer = CurrentUser {
            id: "user:ada".to_string(),
            username: "ada".to_string(),
            role: "customer".to_string(),
        };
        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }
}
