use serde::{Deserialize, Serialize};

use super::sort::SortKey;
use crate::auth::{Identity, Role};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: chrono::NaiveDateTime,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.to_string(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortKey {
    Id,
    Email,
    Role,
    #[default]
    CreatedAt,
}

impl SortKey for UserSortKey {
    fn column(&self) -> &'static str {
        match self {
            UserSortKey::Id => "id",
            UserSortKey::Email => "email",
            UserSortKey::Role => "role",
            UserSortKey::CreatedAt => "created_at",
        }
    }
}
