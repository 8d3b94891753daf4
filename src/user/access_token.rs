//! Signed, time-bounded access tokens for administrator sessions.

use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// The user id the token was issued to.
    pub sub: i64,
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and verifies HS256 tokens. Stateless: the server keeps no record of
/// issued tokens, expiry is the only revocation.
#[derive(Clone)]
pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl AccessTokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Random secret for single-process deployments that did not configure one.
    pub fn generate_secret() -> String {
        let rng = rand::rng();
        rng.sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| anyhow!("system clock before unix epoch: {}", err))?
            .as_secs();
        let claims = AccessTokenClaims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| anyhow!("failed to sign access token: {}", err))
    }

    /// Returns the claims of a valid, unexpired token, None otherwise.
    pub fn verify(&self, token: &str) -> Option<AccessTokenClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }
}
