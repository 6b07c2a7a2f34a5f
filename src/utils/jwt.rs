use crate::error::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims minted by the hosted auth service. We only verify; we never issue.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// stable subject identifier for the account
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;

        if claims.sub.is_empty() {
            return Err(AppError::AuthError("Token has an empty subject".to_string()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn make_token(secret: &str, sub: &str, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: Some("dana@example.com".to_string()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let service = JwtService::new("test-secret");
        let token = make_token("test-secret", "auth0|abc123", Duration::hours(1));
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "auth0|abc123");
        assert_eq!(claims.email.as_deref(), Some("dana@example.com"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = JwtService::new("test-secret");
        let token = make_token("other-secret", "auth0|abc123", Duration::hours(1));
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = JwtService::new("test-secret");
        let token = make_token("test-secret", "auth0|abc123", Duration::hours(-2));
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_empty_subject() {
        let service = JwtService::new("test-secret");
        let token = make_token("test-secret", "", Duration::hours(1));
        assert!(service.verify_token(&token).is_err());
    }
}
