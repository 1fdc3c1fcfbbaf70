use tracing::{info, warn};

use crate::errors::DefensisError;
use super::store::SessionStore;
use super::user::{Plan, UserPatch, UserRecord, USER_KEY};

/// Mock sign-in flow over a [`SessionStore`]. Credentials are only checked for presence;
/// nothing about the password is stored.
pub struct AuthSession {
    store: SessionStore,
    user: Option<UserRecord>,
}

impl AuthSession {
    pub fn new(store: SessionStore) -> Self {
        Self { store, user: None }
    }

    /// Load the stored user, discarding a record that cannot be parsed.
    pub async fn restore(store: SessionStore) -> Result<Self, DefensisError> {
        let mut session = Self::new(store);
        if let Some(raw) = session.store.get(USER_KEY).await? {
            match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => session.user = Some(user),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored user");
                    session.store.remove(USER_KEY).await?;
                }
            }
        }
        Ok(session)
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns `false` without touching state if either field is empty.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<bool, DefensisError> {
        if email.is_empty() || password.is_empty() {
            return Ok(false);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.sign_in(UserRecord {
            id: "1".to_string(),
            email: email.to_string(),
            name,
            avatar: None,
            plan: Plan::Free,
        })
        .await?;
        Ok(true)
    }

    pub async fn signup(&mut self, email: &str, password: &str, name: &str) -> Result<bool, DefensisError> {
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Ok(false);
        }
        self.sign_in(UserRecord {
            id: "1".to_string(),
            email: email.to_string(),
            name: name.to_string(),
            avatar: None,
            plan: Plan::Free,
        })
        .await?;
        Ok(true)
    }

    async fn sign_in(&mut self, user: UserRecord) -> Result<(), DefensisError> {
        self.persist(&user).await?;
        info!(email = %user.email, plan = %user.plan, "Signed in");
        self.user = Some(user);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), DefensisError> {
        self.user = None;
        self.store.remove(USER_KEY).await
    }

    /// Merge `patch` into the signed-in user. Errors when nobody is signed in.
    pub async fn update_user(&mut self, patch: UserPatch) -> Result<&UserRecord, DefensisError> {
        let mut user = self
            .user
            .clone()
            .ok_or_else(|| DefensisError::Session("No user is signed in".into()))?;
        user.apply(patch);
        self.persist(&user).await?;
        Ok(&*self.user.insert(user))
    }

    async fn persist(&self, user: &UserRecord) -> Result<(), DefensisError> {
        let json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_derives_name_from_email() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = AuthSession::new(SessionStore::new(dir.path()));
        assert!(session.login("alice@example.com", "hunter2").await.unwrap());
        let user = session.user().unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.id, "1");
        assert_eq!(user.plan, Plan::Free);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = AuthSession::new(SessionStore::new(dir.path()));
        assert!(!session.login("alice@example.com", "").await.unwrap());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_requires_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = AuthSession::new(SessionStore::new(dir.path()));
        assert!(!session.signup("a@b.c", "pw", "").await.unwrap());
        assert!(session.signup("a@b.c", "pw", "Ada").await.unwrap());
        assert_eq!(session.user().unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_update_without_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = AuthSession::new(SessionStore::new(dir.path()));
        let result = session.update_user(UserPatch::default()).await;
        assert!(matches!(result, Err(DefensisError::Session(_))));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.set(USER_KEY, "{not json").await.unwrap();
        let session = AuthSession::restore(store.clone()).await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.get(USER_KEY).await.unwrap(), None);
    }
}
