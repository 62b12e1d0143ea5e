//! JWT verification
//!
//! Tokens are HMAC-signed with a secret shared with the service that issues
//! them. This service only verifies; it never mints tokens.

use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded payload of a verified token.
///
/// The payload layout belongs to the issuer, so it is kept as an opaque JSON
/// object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    /// Look up a single claim
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Initialize a verifier for tokens signed with `secret`
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp and nbf are checked when the issuer sets them, never required.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_aud = false;

        JwtService {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
    use serde_json::json;

    fn sign(alg: Algorithm, secret: &str, claims: Value) -> String {
        encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token should encode")
    }

    #[test]
    fn test_accepts_hmac_tokens_without_expiry() {
        let service = JwtService::new("secreto");
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign(alg, "secreto", json!({ "id": 12, "email": "a@b.cl" }));
            let claims = service.validate_token(&token).expect("token should verify");
            assert_eq!(claims.get("id"), Some(&json!(12)));
        }
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let service = JwtService::new("secreto");
        let token = sign(Algorithm::HS256, "otro", json!({ "id": 12 }));
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = JwtService::new("secreto");
        let exp = get_current_timestamp() - 3600;
        let token = sign(Algorithm::HS256, "secreto", json!({ "id": 12, "exp": exp }));
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let service = JwtService::new("secreto");
        assert!(service.validate_token("not-a-jwt").is_err());
        assert!(service.validate_token("").is_err());
    }
}
