use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::entities::sea_orm_active_enums::RoleEnum;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: RoleEnum,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn user_id(&self) -> Result<uuid::Uuid> {
        uuid::Uuid::parse_str(&self.sub).context("token subject is not a user id")
    }
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn create_jwt(&self, user_id: &str, email: &str, name: &str, role: RoleEnum) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            name: name.to_string(),
            iat: now,
            exp: now + self.expires_in,
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    pub fn verify_jwt(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid or expired token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_role() {
        let jwt = JwtManager::new("test-secret", 3600);
        let token = jwt
            .create_jwt("8a2b7f0e-7b5c-4d0e-9a55-0f5a9c1d2e3f", "a@b.io", "Ada", RoleEnum::Institute)
            .unwrap();
        let claims = jwt.verify_jwt(&token).unwrap();
        assert_eq!(claims.role, RoleEnum::Institute);
        assert_eq!(claims.email, "a@b.io");
        assert!(claims.user_id().is_ok());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = JwtManager::new("one", 3600);
        let verifier = JwtManager::new("two", 3600);
        let token = issuer.create_jwt("x", "a@b.io", "Ada", RoleEnum::Student).unwrap();
        assert!(verifier.verify_jwt(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = JwtManager::new("secret", -3600);
        let token = jwt.create_jwt("x", "a@b.io", "Ada", RoleEnum::Student).unwrap();
        assert!(jwt.verify_jwt(&token).is_err());
    }
}
