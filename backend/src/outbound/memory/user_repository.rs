//! Process-local `UserRepository` used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, ReferralCode, User, UserId};

/// In-memory account store keyed by user id.
///
/// Enforces the same unique columns as the database schema: email, Google
/// subject and referral code.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// First unique column of `candidate` already held by another account.
fn conflicting_field(users: &HashMap<Uuid, User>, candidate: &User) -> Option<&'static str> {
    users
        .values()
        .filter(|existing| existing.id != candidate.id)
        .find_map(|existing| {
            if existing.email == candidate.email {
                Some("email")
            } else if candidate.google_id.is_some() && existing.google_id == candidate.google_id {
                Some("google_id")
            } else if existing.referral_code == candidate.referral_code {
                Some("referral_code")
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.id.as_uuid()) {
            return Err(UserPersistenceError::duplicate("id"));
        }
        if let Some(field) = conflicting_field(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        users.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if !users.contains_key(user.id.as_uuid()) {
            return Err(UserPersistenceError::query(format!(
                "user {} does not exist",
                user.id
            )));
        }
        if let Some(field) = conflicting_field(&users, user) {
            return Err(UserPersistenceError::duplicate(field));
        }
        users.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn referral_code_exists(
        &self,
        code: &ReferralCode,
    ) -> Result<bool, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.values().any(|user| &user.referral_code == code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::fixtures::sample_user;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    fn other_user() -> User {
        let mut user = sample_user();
        user.id = UserId::random();
        user.email = Email::parse("grace@example.com").expect("valid email");
        user.referral_code = ReferralCode::parse("QU00000001").expect("valid code");
        user
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_users_are_found_by_every_key(repo: InMemoryUserRepository) {
        let mut user = sample_user();
        user.google_id = Some("google-sub-1".to_owned());
        repo.insert(&user).await.expect("insert");

        assert_eq!(repo.find_by_id(&user.id).await.expect("by id"), Some(user.clone()));
        assert_eq!(
            repo.find_by_email(&user.email).await.expect("by email"),
            Some(user.clone())
        );
        assert_eq!(
            repo.find_by_google_id("google-sub-1").await.expect("by google id"),
            Some(user.clone())
        );
        assert!(
            repo.referral_code_exists(&user.referral_code)
                .await
                .expect("code lookup")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(repo: InMemoryUserRepository) {
        repo.insert(&sample_user()).await.expect("first insert");
        let mut clash = other_user();
        clash.email = sample_user().email;

        let error = repo.insert(&clash).await.expect_err("duplicate email");
        assert_eq!(error, UserPersistenceError::duplicate("email"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_cannot_steal_a_google_id(repo: InMemoryUserRepository) {
        let mut first = sample_user();
        first.google_id = Some("shared".to_owned());
        let mut second = other_user();
        repo.insert(&first).await.expect("insert first");
        repo.insert(&second).await.expect("insert second");

        second.google_id = Some("shared".to_owned());
        let error = repo.update(&second).await.expect_err("duplicate google id");
        assert_eq!(error, UserPersistenceError::duplicate("google_id"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_user_fails(repo: InMemoryUserRepository) {
        let error = repo.update(&sample_user()).await.expect_err("missing user");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_stored_state(repo: InMemoryUserRepository) {
        let mut user = sample_user();
        repo.insert(&user).await.expect("insert");
        user.bio = Some("Explorer".to_owned());
        repo.update(&user).await.expect("update");

        let stored = repo.find_by_id(&user.id).await.expect("lookup");
        assert_eq!(stored.and_then(|u| u.bio).as_deref(), Some("Explorer"));
    }
}
