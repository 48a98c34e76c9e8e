use crate::{ClientError, ClientResult};
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

// ============================================================================
// Roles & Principal
// ============================================================================

/// Who the bearer credential was issued to. Role checks are exact: an agency
/// principal is never authorized for client-only pages, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Agency,
}

/// The authenticated principal. Exactly one is active at a time, process-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub display_name: String,
}

// ============================================================================
// Credential claims
// ============================================================================

/// Claims embedded in the bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

impl Claims {
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        now_unix > self.exp as i64
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

/// Decode the claims of a stored credential without verifying its signature.
///
/// The client never holds the signing secret; signature verification is the
/// backend's job. This only peeks at the payload so the session store can
/// discard stale credentials on startup.
pub fn decode_claims_unverified(token: &str) -> ClientResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    // Expiry is checked by the session store's own policy so an expired
    // credential can be told apart from a malformed one.
    validation.validate_exp = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ClientError::Validation(format!("Unreadable credential: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_with_exp(exp: i64) -> String {
        let claims = Claims {
            sub: "user-1".to_string(),
            email: Some("jean@example.com".to_string()),
            role: Some("client".to_string()),
            exp: exp as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_without_secret() {
        let token = token_with_exp(Utc::now().timestamp() + 3600);
        let claims = decode_claims_unverified(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role.as_deref(), Some("client"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_claims_detected() {
        let token = token_with_exp(Utc::now().timestamp() - 60);
        let claims = decode_claims_unverified(&token).unwrap();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = decode_claims_unverified("not-a-jwt");
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
