use crate::kv::KeyValueStore;
use ndiaga_core::identity::{decode_claims_unverified, Principal, Role};
use ndiaga_core::{ClientError, ClientResult};
use std::sync::{Arc, Mutex};

const CREDENTIAL_KEY: &str = "auth_token";
const PRINCIPAL_KEY: &str = "user";

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        principal: Principal,
        credential: String,
    },
}

/// Process-wide authentication state: at most one principal at a time.
///
/// `open` rehydrates from persisted storage and applies the expiry policy
/// synchronously, so a stale credential left on disk can never be attached
/// to an outgoing call.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            storage,
            state: Mutex::new(SessionState::Anonymous),
        };
        store.rehydrate();
        store
    }

    /// Persist the credential and principal and become authenticated.
    pub fn login(&self, principal: Principal, credential: &str) {
        self.storage.set(CREDENTIAL_KEY, credential);
        match serde_json::to_string(&principal) {
            Ok(raw) => self.storage.set(PRINCIPAL_KEY, &raw),
            Err(e) => tracing::warn!("Failed to persist principal: {}", e),
        }
        tracing::info!(
            "Session authenticated as {:?} ({})",
            principal.role,
            principal.display_name
        );
        *self.lock() = SessionState::Authenticated {
            principal,
            credential: credential.to_string(),
        };
    }

    /// Clear persisted and in-memory state; become anonymous.
    pub fn logout(&self) {
        self.storage.remove(CREDENTIAL_KEY);
        self.storage.remove(PRINCIPAL_KEY);
        *self.lock() = SessionState::Anonymous;
        tracing::info!("Session cleared");
    }

    /// Startup policy: adopt the persisted session only when the credential
    /// still parses and has not passed its expiry claim. Anything else is
    /// scrubbed from storage.
    pub fn rehydrate(&self) {
        let credential = match self.storage.get(CREDENTIAL_KEY) {
            Some(c) => c,
            None => return,
        };
        let principal_raw = match self.storage.get(PRINCIPAL_KEY) {
            Some(p) => p,
            None => return,
        };

        let claims = match decode_claims_unverified(&credential) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Discarding unreadable persisted credential: {}", e);
                self.logout();
                return;
            }
        };
        if claims.is_expired() {
            tracing::info!("Persisted credential expired, clearing session");
            self.logout();
            return;
        }

        match serde_json::from_str::<Principal>(&principal_raw) {
            Ok(principal) => {
                *self.lock() = SessionState::Authenticated {
                    principal,
                    credential,
                };
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable persisted principal: {}", e);
                self.logout();
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.lock(), SessionState::Authenticated { .. })
    }

    pub fn principal(&self) -> Option<Principal> {
        match &*self.lock() {
            SessionState::Authenticated { principal, .. } => Some(principal.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// The credential to attach to authenticated calls, if any.
    pub fn bearer(&self) -> Option<String> {
        match &*self.lock() {
            SessionState::Authenticated { credential, .. } => Some(credential.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// Like `bearer`, but for operations that cannot proceed anonymously.
    /// A credential that expired mid-session is treated the same as a missing
    /// one: the session is cleared and the caller redirects to sign-in.
    pub fn require_bearer(&self) -> ClientResult<String> {
        let credential = match self.bearer() {
            Some(c) => c,
            None => return Err(ClientError::SessionExpired),
        };
        match decode_claims_unverified(&credential) {
            Ok(claims) if !claims.is_expired() => Ok(credential),
            _ => {
                self.logout();
                Err(ClientError::SessionExpired)
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use ndiaga_core::identity::Claims;

    fn token(exp_offset_secs: i64) -> String {
        let claims = Claims {
            sub: "user-1".to_string(),
            email: None,
            role: Some("client".to_string()),
            exp: (Utc::now().timestamp() + exp_offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    fn client_principal() -> Principal {
        Principal {
            id: "user-1".to_string(),
            role: Role::Client,
            display_name: "Jean Dupont".to_string(),
        }
    }

    #[test]
    fn test_login_logout_lifecycle() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::open(storage.clone());
        assert!(!session.is_authenticated());

        session.login(client_principal(), &token(3600));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Client));
        assert!(session.bearer().is_some());

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(storage.get("auth_token"), None);
    }

    #[test]
    fn test_valid_session_survives_reopen() {
        let storage = Arc::new(MemoryStore::new());
        SessionStore::open(storage.clone()).login(client_principal(), &token(3600));

        let rehydrated = SessionStore::open(storage);
        assert!(rehydrated.is_authenticated());
        assert_eq!(
            rehydrated.principal().unwrap().display_name,
            "Jean Dupont"
        );
    }

    #[test]
    fn test_expired_credential_discarded_on_open() {
        let storage = Arc::new(MemoryStore::new());
        SessionStore::open(storage.clone()).login(client_principal(), &token(-60));

        let rehydrated = SessionStore::open(storage.clone());
        assert!(!rehydrated.is_authenticated());
        // Expired credential must never reach an outgoing call, and must be
        // scrubbed from storage.
        assert_eq!(rehydrated.bearer(), None);
        assert_eq!(storage.get("auth_token"), None);
    }

    #[test]
    fn test_require_bearer_clears_session_expired_mid_session() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::open(storage.clone());
        // Expired at issue time; login itself does not re-check expiry.
        session.login(client_principal(), &token(-60));
        assert!(session.is_authenticated());

        let result = session.require_bearer();
        assert!(matches!(result, Err(ClientError::SessionExpired)));
        assert!(!session.is_authenticated());
        assert_eq!(storage.get("auth_token"), None);
    }

    #[test]
    fn test_require_bearer_anonymous() {
        let session = SessionStore::open(Arc::new(MemoryStore::new()));
        assert!(matches!(
            session.require_bearer(),
            Err(ClientError::SessionExpired)
        ));
    }

    #[test]
    fn test_garbage_credential_discarded_on_open() {
        let storage = Arc::new(MemoryStore::new());
        storage.set("auth_token", "not-a-jwt");
        storage.set("user", "{}");

        let session = SessionStore::open(storage.clone());
        assert!(!session.is_authenticated());
        assert_eq!(storage.get("auth_token"), None);
    }
}
