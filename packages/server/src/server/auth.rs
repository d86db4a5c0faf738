use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of an access token issued by the hosted auth provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,             // User id
    pub email: Option<String>, // Sign-in email, when the provider includes it
    pub aud: String,           // Audience
    pub exp: i64,              // Expiration timestamp
    pub role: Option<String>,  // Provider role (e.g. "authenticated")
}

/// Verifies HS256 access tokens. Tokens are never issued here.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    audience: String,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.into(),
        }
    }

    /// Verify signature, expiry and audience.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}
