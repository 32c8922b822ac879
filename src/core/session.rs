//! Admin sign-in. Authentication (the provider accepts the credentials) and
//! authorization (the profile says `admin`) are checked separately.

use crate::domain::model::{Identity, Role};
use crate::domain::ports::{IdentityProvider, RoleDirectory};
use crate::utils::error::{AdminError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    /// Credentials accepted, admin role not (yet) confirmed.
    Authenticated(Identity),
    Authorized(Identity),
}

pub struct AdminSession<I: IdentityProvider, R: RoleDirectory> {
    identity_provider: I,
    roles: R,
    state: SessionState,
}

impl<I: IdentityProvider, R: RoleDirectory> AdminSession<I, R> {
    pub fn new(identity_provider: I, roles: R) -> Self {
        Self {
            identity_provider,
            roles,
            state: SessionState::SignedOut,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self.state, SessionState::SignedOut)
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self.state, SessionState::Authorized(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::SignedOut => None,
            SessionState::Authenticated(identity) | SessionState::Authorized(identity) => {
                Some(identity)
            }
        }
    }

    pub async fn authenticate(&mut self, email: &str, password: &str) -> Result<Identity> {
        self.state = SessionState::SignedOut;
        let identity = self.identity_provider.sign_in(email, password).await?;
        tracing::debug!("Signed in as {}", identity.uid);
        self.state = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// Requires a prior successful `authenticate`.
    pub async fn authorize(&mut self) -> Result<Identity> {
        let identity = match &self.state {
            SessionState::SignedOut => {
                return Err(AdminError::AuthenticationError {
                    message: "not signed in".to_string(),
                })
            }
            SessionState::Authorized(identity) => return Ok(identity.clone()),
            SessionState::Authenticated(identity) => identity.clone(),
        };

        match self.roles.role_of(&identity).await? {
            Some(Role::Admin) => {
                tracing::info!("Admin access granted to {}", identity.email);
                self.state = SessionState::Authorized(identity.clone());
                Ok(identity)
            }
            role => {
                tracing::warn!("{} signed in with role {:?}, access denied", identity.uid, role);
                Err(AdminError::NotAuthorized { uid: identity.uid })
            }
        }
    }

    /// `authenticate` then `authorize`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity> {
        self.authenticate(email, password).await?;
        self.authorize().await
    }

    pub async fn logout(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, SessionState::SignedOut);
        if let SessionState::Authenticated(identity) | SessionState::Authorized(identity) = previous
        {
            self.identity_provider.sign_out(&identity).await?;
            tracing::info!("Signed out {}", identity.email);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticIdentities {
        accounts: HashMap<String, (String, String)>,
    }

    #[async_trait]
    impl IdentityProvider for StaticIdentities {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
            match self.accounts.get(email) {
                Some((expected, uid)) if expected == password => Ok(Identity {
                    uid: uid.clone(),
                    email: email.to_string(),
                    id_token: format!("token-{uid}"),
                }),
                _ => Err(AdminError::AuthenticationError {
                    message: "INVALID_LOGIN_CREDENTIALS".to_string(),
                }),
            }
        }
    }

    struct StaticRoles(HashMap<String, Role>);

    #[async_trait]
    impl RoleDirectory for StaticRoles {
        async fn role_of(&self, identity: &Identity) -> Result<Option<Role>> {
            Ok(self.0.get(&identity.uid).copied())
        }
    }

    fn session() -> AdminSession<StaticIdentities, StaticRoles> {
        let accounts = HashMap::from([
            ("boss@salon.test".to_string(), ("pw".to_string(), "admin-1".to_string())),
            ("client@salon.test".to_string(), ("pw".to_string(), "user-1".to_string())),
            ("ghost@salon.test".to_string(), ("pw".to_string(), "ghost-1".to_string())),
        ]);
        let roles = HashMap::from([
            ("admin-1".to_string(), Role::Admin),
            ("user-1".to_string(), Role::User),
        ]);
        AdminSession::new(StaticIdentities { accounts }, StaticRoles(roles))
    }

    #[tokio::test]
    async fn test_admin_login_is_authorized() {
        let mut session = session();
        let identity = session.login("boss@salon.test", "pw").await.unwrap();
        assert_eq!(identity.uid, "admin-1");
        assert!(session.is_authorized());
    }

    #[tokio::test]
    async fn test_non_admin_is_authenticated_but_not_authorized() {
        let mut session = session();
        let err = session.login("client@salon.test", "pw").await.unwrap_err();
        assert!(matches!(err, AdminError::NotAuthorized { .. }));
        assert!(session.is_authenticated());
        assert!(!session.is_authorized());
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_authorized() {
        let mut session = session();
        let err = session.login("ghost@salon.test", "pw").await.unwrap_err();
        assert!(matches!(err, AdminError::NotAuthorized { .. }));
    }

    #[tokio::test]
    async fn test_bad_password_leaves_session_signed_out() {
        let mut session = session();
        let err = session.login("boss@salon.test", "nope").await.unwrap_err();
        assert!(matches!(err, AdminError::AuthenticationError { .. }));
        assert_eq!(session.state(), &SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_authorize_requires_authentication() {
        let mut session = session();
        assert!(session.authorize().await.is_err());
    }

    #[tokio::test]
    async fn test_logout_clears_state() {
        let mut session = session();
        session.login("boss@salon.test", "pw").await.unwrap();
        session.logout().await.unwrap();
        assert_eq!(session.state(), &SessionState::SignedOut);
        assert!(session.identity().is_none());
    }
}
