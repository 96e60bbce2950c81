use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserDirectoryPort;
use crate::domain::user::ports::UserRepository;

/// Domain service for the user directory.
///
/// Holds the refresh-token store alongside the user repository so user
/// deletion can revoke every session the user still owns; without that,
/// deletion would leave orphaned, still-verifiable refresh tokens behind.
pub struct UserService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    repository: Arc<UR>,
    refresh_tokens: Arc<RT>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, RT> UserService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `refresh_tokens` - Refresh-token store, for cascade revocation
    pub fn new(repository: Arc<UR>, refresh_tokens: Arc<RT>) -> Self {
        Self {
            repository,
            refresh_tokens,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR, RT> UserDirectoryPort for UserService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            login: command.login,
            password_hash,
            metadata: command.metadata,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        // Revoke sessions first: if the row delete fails afterwards the user
        // merely has to log in again, whereas the reverse order can leave
        // tokens pointing at a nonexistent user.
        self.refresh_tokens
            .delete_all_for_user(id)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted and sessions revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::session::errors::SessionError;
    use crate::domain::session::models::RefreshTokenRecord;
    use crate::domain::user::models::Login;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_login(&self, login: &Login) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn insert(&self, token: &str, user_id: &UserId) -> Result<(), SessionError>;
            async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, SessionError>;
            async fn delete_by_token(&self, token: &str) -> Result<(), SessionError>;
            async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), SessionError>;
            async fn rotate(&self, old_token: &str, new_token: &str, user_id: &UserId) -> Result<bool, SessionError>;
        }
    }

    fn command(login: &str) -> CreateUserCommand {
        CreateUserCommand {
            login: Login::new(login.to_string()).unwrap(),
            password: "p@ss1".to_string(),
            metadata: Some(serde_json::json!({"locale": "en"})),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repository = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.login.as_str() == "alice" && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        let user = service.create_user(command("alice")).await.unwrap();
        assert_eq!(user.login.as_str(), "alice");
        // The plaintext never reaches storage.
        assert_ne!(user.password_hash, "p@ss1");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_login() {
        let mut repository = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::LoginAlreadyExists(
                user.login.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        let result = service.create_user(command("alice")).await;
        assert!(matches!(result, Err(UserError::LoginAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_revokes_sessions_first() {
        let mut repository = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user_id = UserId::new();

        refresh_tokens
            .expect_delete_all_for_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        repository
            .expect_delete()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        assert!(service.delete_user(&user_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        let mut refresh_tokens = MockTestRefreshTokenRepository::new();

        let user_id = UserId::new();

        refresh_tokens
            .expect_delete_all_for_user()
            .times(1)
            .returning(|_| Ok(()));

        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(UserError::NotFound(user_id.to_string())));

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        let result = service.delete_user(&user_id).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut repository = MockTestUserRepository::new();
        let refresh_tokens = MockTestRefreshTokenRepository::new();

        repository.expect_list_all().times(1).returning(|| {
            Ok(vec![
                User {
                    id: UserId::new(),
                    login: Login::new("alice".to_string()).unwrap(),
                    password_hash: "$argon2id$test_hash".to_string(),
                    metadata: None,
                    created_at: Utc::now(),
                },
                User {
                    id: UserId::new(),
                    login: Login::new("bob".to_string()).unwrap(),
                    password_hash: "$argon2id$test_hash".to_string(),
                    metadata: None,
                    created_at: Utc::now(),
                },
            ])
        });

        let service = UserService::new(Arc::new(repository), Arc::new(refresh_tokens));

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
    }
}
