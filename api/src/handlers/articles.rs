use axum::{extract::State, http::StatusCode, Json};

use super::user_id;
use crate::{
    auth::CurrentUser,
    db,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::{
        article::{Article, ArticleSortKey, NewArticle, UpdateArticle},
        sort::SortParams,
    },
    AppState,
};

pub async fn list_published(
    State(state): State<AppState>,
    AppQuery(sort): AppQuery<SortParams<ArticleSortKey>>,
) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(db::articles::list(&state.db, true, &sort).await?))
}

pub async fn read_published(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Article>, AppError> {
    let article = db::articles::read_published(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("article"))?;
    Ok(Json(article))
}

pub async fn list_all(
    State(state): State<AppState>,
    AppQuery(sort): AppQuery<SortParams<ArticleSortKey>>,
) -> Result<Json<Vec<Article>>, AppError> {
    Ok(Json(db::articles::list(&state.db, false, &sort).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppJson(payload): AppJson<NewArticle>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let author_id = user_id(&identity)?;
    let article = db::articles::create(&state.db, author_id, &payload).await?;
    tracing::info!(article_id = article.id, author_id, "article created");

    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(changes): AppJson<UpdateArticle>,
) -> Result<Json<Article>, AppError> {
    if matches!(&changes.title, Some(title) if title.trim().is_empty()) {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let article = db::articles::update(&state.db, id, &changes)
        .await?
        .ok_or(AppError::NotFound("article"))?;
    Ok(Json(article))
}

pub async fn publish(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Article>, AppError> {
    let article = db::articles::set_published(&state.db, id, true)
        .await?
        .ok_or(AppError::NotFound("article"))?;
    tracing::info!(article_id = id, "article published");
    Ok(Json(article))
}

pub async fn unpublish(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Article>, AppError> {
    let article = db::articles::set_published(&state.db, id, false)
        .await?
        .ok_or(AppError::NotFound("article"))?;
    tracing::info!(article_id = id, "article unpublished");
    Ok(Json(article))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !db::articles::delete(&state.db, id).await? {
        return Err(AppError::NotFound("article"));
    }
    tracing::info!(article_id = id, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}
