use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{password, CurrentUser, Identity, Role},
    db,
    error::AppError,
    extract::AppJson,
    models::user::{AuthResponse, CreateUser, LoginPayload, User},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let password_hash =
        tokio::task::spawn_blocking(move || password::hash(&payload.password)).await??;

    let user = db::users::create(&state.db, &email, &password_hash, Role::default()).await?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    let user = db::users::find_by_email(&state.db, &email).await?;

    // Unknown accounts go through bcrypt too, so timing does not reveal them.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || {
        password::verify_login(&payload.password, stored_hash.as_deref())
    })
    .await?;

    let user = match user {
        Some(user) if matches => user,
        Some(user) => {
            tracing::info!(user_id = user.id, "login failed: wrong password");
            return Err(AppError::LoginFail);
        }
        None => {
            tracing::info!("login failed: unknown email");
            return Err(AppError::LoginFail);
        }
    };

    let token = state.tokens.issue(&user.identity())?;
    tracing::info!(user_id = user.id, role = %user.role, "login successful");

    Ok(Json(AuthResponse { token }))
}

pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
