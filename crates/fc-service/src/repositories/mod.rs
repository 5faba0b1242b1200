//! Database access layer.

pub mod accounts;
pub mod feedback;
pub mod rooms;

/// True when `err` is a PostgreSQL unique violation (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
