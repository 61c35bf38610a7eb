//! Signed bearer tokens.
//!
//! Tokens are two base64url segments, `payload.signature`, where the payload
//! is the JSON claim set and the signature is HMAC-SHA256 over the encoded
//! payload. Verification checks the signature before parsing the claims, then
//! the expiry. There is no revocation list: a leaked token stays valid until
//! it expires.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::models::Identity;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 7 days.
pub const TOKEN_TTL: Duration = Duration::days(7);

/// The signed claim set.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    /// Expiry as a unix timestamp (seconds).
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for `identity`, expiring [`TOKEN_TTL`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the claims cannot be serialized,
    /// which would indicate a bug rather than bad input.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            identity: identity.clone(),
            exp: (now + TOKEN_TTL).timestamp(),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| AuthError::InvalidToken)?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(encoded.as_bytes())?);

        Ok(format!("{encoded}.{signature}"))
    }

    /// Issue a token for `identity`, expiring 7 days from now.
    ///
    /// # Errors
    ///
    /// See [`Self::issue_at`].
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Verify a token at a given instant and return the embedded identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for structural or signature
    /// failures, and `AuthError::ExpiredToken` for a valid signature past
    /// its expiry.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let (encoded, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::InvalidToken)?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&provided)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp < now.timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims.identity)
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::verify_at`].
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::InvalidToken)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
