use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    auth::Role,
    db,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::{
        sort::SortParams,
        user::{User, UserSortKey},
    },
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

pub async fn list(
    State(state): State<AppState>,
    AppQuery(sort): AppQuery<SortParams<UserSortKey>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(db::users::list(&state.db, &sort).await?))
}

pub async fn set_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(change): AppJson<RoleChange>,
) -> Result<Json<User>, AppError> {
    let user = db::users::set_role(&state.db, id, change.role)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    tracing::info!(user_id = user.id, role = %user.role, "role changed");
    Ok(Json(user))
}
