use crate::session::SessionStore;
use ndiaga_core::identity::Role;

/// Where a role guard sends the user instead of rendering the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    SignIn,
    AgencyDashboard,
}

/// Guard for the agency login/signup pages: an already-authenticated agency
/// has no business there and goes straight to its dashboard.
pub fn agency_auth_redirect(session: &SessionStore) -> Option<Redirect> {
    if session.is_authenticated() {
        Some(Redirect::AgencyDashboard)
    } else {
        None
    }
}

/// Guard for client-only pages. The role must match exactly: an agency
/// principal is not authorized for client pages and is sent to sign-in,
/// same as an anonymous visitor.
pub fn client_route_guard(session: &SessionStore) -> Option<Redirect> {
    match session.role() {
        Some(Role::Client) => None,
        _ => Some(Redirect::SignIn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use ndiaga_core::identity::{Claims, Principal};
    use std::sync::Arc;

    fn session_with_role(role: Option<Role>) -> SessionStore {
        let session = SessionStore::open(Arc::new(MemoryStore::new()));
        if let Some(role) = role {
            let claims = Claims {
                sub: "p-1".to_string(),
                email: None,
                role: None,
                exp: (Utc::now().timestamp() + 3600) as usize,
            };
            let token = encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(b"secret"),
            )
            .unwrap();
            session.login(
                Principal {
                    id: "p-1".to_string(),
                    role,
                    display_name: "Test".to_string(),
                },
                &token,
            );
        }
        session
    }

    #[test]
    fn test_agency_principal_redirected_from_client_pages() {
        let session = session_with_role(Some(Role::Agency));
        assert_eq!(client_route_guard(&session), Some(Redirect::SignIn));
    }

    #[test]
    fn test_client_principal_allowed_on_client_pages() {
        let session = session_with_role(Some(Role::Client));
        assert_eq!(client_route_guard(&session), None);
    }

    #[test]
    fn test_anonymous_redirected_to_sign_in() {
        let session = session_with_role(None);
        assert_eq!(client_route_guard(&session), Some(Redirect::SignIn));
    }

    #[test]
    fn test_authenticated_agency_skips_auth_pages() {
        let session = session_with_role(Some(Role::Agency));
        assert_eq!(
            agency_auth_redirect(&session),
            Some(Redirect::AgencyDashboard)
        );
        let anonymous = session_with_role(None);
        assert_eq!(agency_auth_redirect(&anonymous), None);
    }
}
