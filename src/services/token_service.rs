use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenError {
    Malformed(String),
    Expired,
    InvalidSignature,
    /// The expiry would fall outside the representable time range
    ExpiryOutOfRange,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(msg) => write!(f, "Malformed token: {}", msg),
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
            TokenError::ExpiryOutOfRange => write!(f, "Token expiry out of range"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Signs and checks bearer tokens.
///
/// New tokens are always signed with the active secret. Verification also
/// accepts the previous secrets so keys can be rotated without logging
/// everybody out.
#[derive(Clone)]
pub struct TokenService {
    active: String,
    previous: Vec<String>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(active: impl Into<String>, previous: Vec<String>, ttl: Duration) -> Self {
        Self {
            active: active.into(),
            previous,
            ttl,
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.active.as_bytes()),
        )
        .map_err(|e| TokenError::Malformed(format!("Failed to generate token: {}", e)))
    }

    /// Extracts the claims without checking signature or expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let mut last_error = TokenError::InvalidSignature;
        for secret in std::iter::once(&self.active).chain(self.previous.iter()) {
            let key = DecodingKey::from_secret(secret.as_bytes());
            match decode::<Claims>(token, &key, &validation) {
                Ok(data) => return Ok(data.claims),
                Err(e) => match TokenError::from(e) {
                    // Only a signature mismatch is worth retrying with an older key
                    TokenError::InvalidSignature => last_error = TokenError::InvalidSignature,
                    other => return Err(other),
                },
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, vec![], Duration::hours(24))
    }

    #[test]
    fn issued_token_verifies_to_the_same_email() {
        let tokens = service("secret");
        let token = tokens.issue("test@gmail.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.email, "test@gmail.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = service("other").issue("test@gmail.com").unwrap();
        assert_eq!(service("secret").verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn previous_keys_still_verify_after_rotation() {
        let old = service("old-secret");
        let token = old.issue("test@gmail.com").unwrap();

        let previous = vec!["old-secret".to_string()];
        let rotated = TokenService::new("new-secret", previous, Duration::hours(24));
        assert_eq!(rotated.verify(&token).unwrap().email, "test@gmail.com");

        // fresh tokens are signed with the new key only
        let fresh = rotated.issue("test@gmail.com").unwrap();
        assert_eq!(old.verify(&fresh), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected_but_still_decodes() {
        let tokens = TokenService::new("secret", vec![], Duration::hours(-2));
        let token = tokens.issue("late@gmail.com").unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
        assert_eq!(tokens.decode(&token).unwrap().email, "late@gmail.com");
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let tokens = TokenService::new("secret", vec![], Duration::days(1_000_000_000));
        assert_eq!(tokens.issue("far@gmail.com"), Err(TokenError::ExpiryOutOfRange));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service("secret");
        assert!(matches!(tokens.decode("not-a-token"), Err(TokenError::Malformed(_))));
        assert!(matches!(tokens.verify("not-a-token"), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn decode_ignores_the_signature() {
        let token = service("somebody-else").issue("who@gmail.com").unwrap();
        assert_eq!(service("secret").decode(&token).unwrap().email, "who@gmail.com");
    }
}
