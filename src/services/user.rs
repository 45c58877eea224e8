//! User service
//!
//! Registration, login, session management and watch history.

use crate::db::repositories::{SessionRepository, UserRepository, WatchHistoryRepository};
use crate::models::{CreateUserInput, Session, User};
use crate::services::password;
use chrono::{Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Session lifetime
const SESSION_TTL_DAYS: i64 = 7;

/// User service errors
#[derive(Debug, Error)]
pub enum UserError {
    /// User not found
    #[error("User not found")]
    NotFound,

    /// Username or email already registered
    #[error("Username or email already taken")]
    AlreadyExists,

    /// Wrong username/password combination
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or expired session token
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// User service
pub struct UserService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    watch_history: Arc<dyn WatchHistoryRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        watch_history: Arc<dyn WatchHistoryRepository>,
    ) -> Self {
        Self {
            users,
            sessions,
            watch_history,
        }
    }

    /// Register a new user
    pub async fn register(&self, input: CreateUserInput) -> Result<User, UserError> {
        if input.username.trim().is_empty() {
            return Err(UserError::Validation("Username is required".to_string()));
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(UserError::Validation("A valid email is required".to_string()));
        }
        if input.password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.users.get_by_username(&input.username).await?.is_some()
            || self.users.get_by_email(&input.email).await?.is_some()
        {
            return Err(UserError::AlreadyExists);
        }

        let hash = password::hash_password(&input.password)?;
        let user = self.users.create(&input, &hash).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Log in with username (or email) and password, issuing a session.
    pub async fn login(
        &self,
        username_or_email: &str,
        plain_password: &str,
    ) -> Result<(User, Session), UserError> {
        let user = match self.users.get_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.users.get_by_email(username_or_email).await?,
        };
        // Same error for unknown user and wrong password.
        let user = user.ok_or(UserError::InvalidCredentials)?;

        if !password::verify_password(plain_password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
            created_at: now,
        };
        let session = self.sessions.create(&session).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, session))
    }

    /// Invalidate a session
    pub async fn logout(&self, session_id: &str) -> Result<(), UserError> {
        self.sessions.delete(session_id).await?;
        Ok(())
    }

    /// Resolve a session token to its user
    pub async fn authenticate(&self, session_id: &str) -> Result<User, UserError> {
        let session = self
            .sessions
            .get_by_id(session_id)
            .await?
            .ok_or(UserError::InvalidSession)?;

        if session.is_expired() {
            self.sessions.delete(session_id).await?;
            return Err(UserError::InvalidSession);
        }

        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or(UserError::InvalidSession)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.users.get_by_id(id).await?.ok_or(UserError::NotFound)
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.users
            .get_by_username(username)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Video IDs in the user's watch history, most recent first
    pub async fn watch_history(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<i64>, UserError> {
        Ok(self
            .watch_history
            .watched_video_ids(user_id, limit, offset)
            .await?)
    }

    /// Record a video in the user's watch history. Rewatching moves
    /// the entry to the top.
    pub async fn record_watch(&self, user_id: i64, video_id: i64) -> Result<(), UserError> {
        self.watch_history.record(user_id, video_id).await?;
        Ok(())
    }

    /// Clear the user's watch history
    pub async fn clear_watch_history(&self, user_id: i64) -> Result<(), UserError> {
        self.watch_history.clear(user_id).await?;
        Ok(())
    }

    /// Remove expired sessions; intended for a periodic sweep
    pub async fn cleanup_sessions(&self) -> Result<i64, UserError> {
        let removed = self.sessions.delete_expired().await?;
        if removed > 0 {
            tracing::debug!(removed, "Expired sessions removed");
        }
        Ok(removed)
    }
}
