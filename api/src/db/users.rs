use sqlx::SqlitePool;

use crate::{
    auth::Role,
    models::{
        sort::SortParams,
        user::{User, UserSortKey},
    },
};

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &SqlitePool,
    sort: &SortParams<UserSortKey>,
) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!("SELECT * FROM users {}", sort.order_by());
    sqlx::query_as::<_, User>(&sql).fetch_all(pool).await
}

pub async fn set_role(pool: &SqlitePool, id: i64, role: Role) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("UPDATE users SET role = ? WHERE id = ? RETURNING *")
        .bind(role)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Creates the account as admin, or promotes an existing one. An existing
/// password is left alone.
pub async fn ensure_admin(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?)
        ON CONFLICT (email) DO UPDATE SET role = excluded.role
        RETURNING *"#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(Role::Admin)
    .fetch_one(pool)
    .await
}
