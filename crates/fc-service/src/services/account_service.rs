//! Account registration, login and lookup.

use crate::crypto::{CredentialStore, TokenService};
use crate::errors::{ConflictError, CredentialError, FcError};
use crate::models::{Account, AccountView, AuthResponse};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_login, record_registration};
use crate::repositories::accounts;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const MIN_PASSWORD_LENGTH: usize = 6;
/// bcrypt ignores input past 72 bytes; longer passwords are refused.
const MAX_PASSWORD_BYTES: usize = 72;
const MAX_EMAIL_LENGTH: usize = 254;

/// Register a new account and log it straight in.
///
/// # Steps
///
/// 1. Normalize and validate email
/// 2. Validate password length
/// 3. Hash password (blocking pool)
/// 4. Insert; the unique constraint decides duplicates
/// 5. Issue session token
#[instrument(skip_all)]
pub async fn register(
    pool: &PgPool,
    credentials: &CredentialStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<AuthResponse, FcError> {
    let email = normalize_email(email);

    if let Err(e) = validate_email(&email).and_then(|()| validate_password(password)) {
        record_registration("invalid");
        return Err(e);
    }

    let password_hash = credentials.hash_blocking(password.to_string()).await?;

    let account = match accounts::create_account(pool, &email, &password_hash).await {
        Ok(account) => account,
        Err(FcError::Conflict(ConflictError::DuplicateEmail)) => {
            tracing::info!(
                target: "fc.accounts",
                email_hash = %hash_for_correlation(&email),
                "Registration rejected: email already registered"
            );
            record_registration("duplicate");
            return Err(FcError::Conflict(ConflictError::DuplicateEmail));
        }
        Err(e) => {
            record_registration("error");
            return Err(e);
        }
    };

    let token = tokens.issue(account.id)?;
    record_registration("success");

    tracing::info!(target: "fc.accounts", account_id = %account.id, "Account registered");

    Ok(AuthResponse {
        token,
        user: AccountView::from(&account),
    })
}

/// Verify email and password and issue a fresh session token.
///
/// Unknown email and wrong password produce the same error. A stored hash
/// that cannot be parsed is logged and also reported as bad credentials.
#[instrument(skip_all)]
pub async fn login(
    pool: &PgPool,
    credentials: &CredentialStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<AuthResponse, FcError> {
    let email = normalize_email(email);

    if email.is_empty() || password.is_empty() {
        return Err(FcError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let Some(account) = accounts::get_by_email(pool, &email).await? else {
        tracing::debug!(
            target: "fc.accounts",
            email_hash = %hash_for_correlation(&email),
            "Login failed: unknown email"
        );
        record_login("invalid_credentials");
        return Err(FcError::InvalidCredentials);
    };

    let verified = credentials
        .verify_blocking(account.password_hash.clone(), password.to_string())
        .await;

    match verified {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(
                target: "fc.accounts",
                email_hash = %hash_for_correlation(&email),
                "Login failed: wrong password"
            );
            record_login("invalid_credentials");
            return Err(FcError::InvalidCredentials);
        }
        Err(CredentialError::MalformedHash) => {
            tracing::error!(
                target: "fc.accounts",
                account_id = %account.id,
                "Stored password hash is malformed"
            );
            record_login("error");
            return Err(FcError::InvalidCredentials);
        }
        Err(e) => {
            record_login("error");
            return Err(e.into());
        }
    }

    let token = tokens.issue(account.id)?;
    record_login("success");

    Ok(AuthResponse {
        token,
        user: AccountView::from(&account),
    })
}

/// Look up the account behind an authenticated session.
///
/// A valid token for an account that no longer exists is treated as not
/// found rather than as an authentication failure.
#[instrument(skip_all)]
pub async fn get_account(pool: &PgPool, account_id: Uuid) -> Result<Account, FcError> {
    accounts::get_by_id(pool, account_id)
        .await?
        .ok_or_else(|| FcError::NotFound("User not found".to_string()))
}

/// Trim and lower-case an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), FcError> {
    if email.len() > MAX_EMAIL_LENGTH || !is_valid_email(email) {
        return Err(FcError::BadRequest("Invalid email format".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), FcError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FcError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(FcError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Basic `local@domain.tld` check.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }

    domain_parts.iter().all(|p| !p.is_empty())
}
