//! User accounts: registration, lookup, login check

use crate::db::users as store;
use dawker_common::credentials::{hash_password, verify_password};
use dawker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Role given when registration does not name one
pub const DEFAULT_ROLE: &str = "USER";

/// Stored user, without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account; Conflict if the username or email is taken
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let username = request.username.trim();
        let email = request.email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(Error::InvalidInput(
                "Username and email must not be blank".to_string(),
            ));
        }
        if request.password.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty".to_string()));
        }

        if let Some(field) = store::find_taken_field(&self.pool, username, email).await? {
            return Err(Error::Conflict(format!("A user with this {} already exists", field)));
        }

        let role = request
            .role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_ROLE);

        let password_hash = hash_password(&request.password)?;
        let user = store::insert_user(&self.pool, username, email, &password_hash, role)
            .await
            .map_err(|e| {
                // Lost a race with a concurrent registration
                if e.is_unique_violation() {
                    Error::Conflict("Username or email already exists".to_string())
                } else {
                    e
                }
            })?;

        info!(user_id = user.id, "Registered user '{}'", user.username);
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        store::get_user(&self.pool, id)
            .await?
            .ok_or_else(|| Error::not_found("User", id))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        store::list_users(&self.pool).await
    }

    /// Delete a user together with their projects and notes
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !store::delete_user(&self.pool, id).await? {
            return Err(Error::not_found("User", id));
        }

        info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Check a login; the same error for unknown email and wrong password
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User> {
        let rejected = || Error::Unauthorized("Invalid email or password".to_string());

        let (user, stored) = store::find_credentials(&self.pool, request.email.trim())
            .await?
            .ok_or_else(rejected)?;

        if verify_password(&request.password, &stored)? {
            Ok(user)
        } else {
            warn!(user_id = user.id, "Failed login attempt");
            Err(rejected())
        }
    }
}
