//! Account repository.
//!
//! Email uniqueness is owned by the `accounts_email_unique` constraint.
//! Callers pass emails already normalized to lower case.

use crate::errors::{ConflictError, FcError};
use crate::models::Account;
use crate::repositories::is_unique_violation;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new account.
///
/// A concurrent or repeated registration for the same email loses on the
/// unique constraint and comes back as `ConflictError::DuplicateEmail`.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<Account, FcError> {
    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (email, password_hash)
        VALUES ($1, $2)
        RETURNING id, email, password_hash, subscription_type, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            FcError::Conflict(ConflictError::DuplicateEmail)
        } else {
            FcError::Database(format!("Failed to create account: {}", e))
        }
    })
}

pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, FcError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, password_hash, subscription_type, created_at
        FROM accounts
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to fetch account by email: {}", e)))?;

    Ok(account)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, FcError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, password_hash, subscription_type, created_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| FcError::Database(format!("Failed to fetch account by id: {}", e)))?;

    Ok(account)
}
