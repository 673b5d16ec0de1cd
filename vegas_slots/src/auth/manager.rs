//! Authentication manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{LoginRequest, RegisterRequest, Session, User, UserId},
};
use crate::db::UserRepository;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    pepper: String,
    session_duration: Duration,
    /// Opaque token -> session
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - User repository
    /// * `pepper` - Server-side pepper for password hashing
    pub fn new(users: Arc<dyn UserRepository>, pepper: String) -> Self {
        Self {
            users,
            pepper,
            session_duration: Duration::hours(24),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Override how long a session token stays valid
    #[must_use]
    pub fn with_session_duration(mut self, session_duration: Duration) -> Self {
        self.session_duration = session_duration;
        self
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidUsername` - Username format invalid
    /// * `AuthError::WeakPassword` - Password too short
    /// * `AuthError::UsernameTaken` - Username already exists
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        self.validate_username(&request.username)?;
        self.validate_password(&request.password)?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .users
            .create_user(&request.username, &password_hash)
            .await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Login a user and open a session
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown username or wrong password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(User, Session)> {
        let credentials = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        self.verify_password(&request.password, &credentials.password_hash)?;
        self.users.update_last_login(credentials.user.id).await?;

        let session = self.create_session(&credentials.user).await;
        Ok((credentials.user, session))
    }

    /// Resolve a session token to its session
    ///
    /// Expired sessions are removed on lookup.
    ///
    /// # Errors
    ///
    /// * `AuthError::SessionNotFound` - Unknown token
    /// * `AuthError::SessionExpired` - Token expired
    pub async fn resolve(&self, token: &str) -> AuthResult<Session> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.write().await.remove(token);
            return Err(AuthError::SessionExpired);
        }

        Ok(session)
    }

    /// Logout by invalidating a session token
    ///
    /// # Errors
    ///
    /// * `AuthError::SessionNotFound` - Unknown token
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .remove(token)
            .map(|session| debug!("Closed session for {}", session.username))
            .ok_or(AuthError::SessionNotFound)
    }

    /// Drop every expired session.
    ///
    /// Returns the users left without any live session, so the caller can
    /// release whatever it keeps per user.
    pub async fn purge_expired(&self) -> Vec<UserId> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let mut purged = Vec::new();
        sessions.retain(|_, session| {
            let expired = session.is_expired_at(now);
            if expired {
                purged.push(session.user_id);
            }
            !expired
        });

        purged.sort_unstable();
        purged.dedup();
        purged.retain(|id| !sessions.values().any(|s| s.user_id == *id));
        purged
    }

    /// Whether the user still holds at least one session.
    pub async fn has_session(&self, user_id: UserId) -> bool {
        self.sessions
            .read()
            .await
            .values()
            .any(|session| session.user_id == user_id)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn create_session(&self, user: &User) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            created_at: now,
            expires_at: now + self.session_duration,
        };

        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    fn validate_username(&self, username: &str) -> AuthResult<()> {
        let len = username.len();
        if !(3..=20).contains(&len) {
            return Err(AuthError::InvalidUsername(
                "Username must be 3-20 characters".to_string(),
            ));
        }

        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AuthError::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        Ok(())
    }
}
