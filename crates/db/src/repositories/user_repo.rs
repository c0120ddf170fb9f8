//! Repository for the `users` table.

use kerbside_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users` queries, with the role name resolved via join.
const COLUMNS: &str = "\
    u.id, u.email, u.password_hash, u.role_id, r.name AS role, \
    u.is_active, u.created_at, u.updated_at";

/// Read access to user accounts. Account management itself belongs to the
/// surrounding platform; the engine only needs role and active-flag lookups.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by email (login path).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id (book-on-behalf lookups).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
