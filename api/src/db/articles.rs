use sqlx::{types::Json, SqlitePool};

use crate::models::{
    article::{Article, ArticleSortKey, ArticleStatus, NewArticle, UpdateArticle},
    sort::SortParams,
};

pub async fn list(
    pool: &SqlitePool,
    published_only: bool,
    sort: &SortParams<ArticleSortKey>,
) -> Result<Vec<Article>, sqlx::Error> {
    let filter = if published_only {
        "WHERE status = 'published'"
    } else {
        ""
    };
    let sql = format!("SELECT * FROM articles {filter} {}", sort.order_by());
    sqlx::query_as::<_, Article>(&sql).fetch_all(pool).await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetches a published article and counts the read in the same statement.
pub async fn read_published(pool: &SqlitePool, id: i64) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        "UPDATE articles SET views = views + 1 WHERE id = ? AND status = ? RETURNING *",
    )
    .bind(id)
    .bind(ArticleStatus::Published)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &SqlitePool,
    author_id: i64,
    article: &NewArticle,
) -> Result<Article, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"INSERT INTO articles
            (title, preview, content, image_url, author_id, tags, institution_id, psychologist_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *"#,
    )
    .bind(&article.title)
    .bind(&article.preview)
    .bind(&article.content)
    .bind(&article.image_url)
    .bind(author_id)
    .bind(Json(&article.tags))
    .bind(article.institution_id)
    .bind(article.psychologist_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &UpdateArticle,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"UPDATE articles SET
            title = COALESCE(?, title),
            preview = COALESCE(?, preview),
            content = COALESCE(?, content),
            image_url = COALESCE(?, image_url),
            tags = COALESCE(?, tags),
            institution_id = COALESCE(?, institution_id),
            psychologist_id = COALESCE(?, psychologist_id),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING *"#,
    )
    .bind(&changes.title)
    .bind(&changes.preview)
    .bind(&changes.content)
    .bind(&changes.image_url)
    .bind(changes.tags.as_ref().map(Json))
    .bind(changes.institution_id)
    .bind(changes.psychologist_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Moves an article between draft and published, keeping `published_at` in
/// step with `status`.
pub async fn set_published(
    pool: &SqlitePool,
    id: i64,
    published: bool,
) -> Result<Option<Article>, sqlx::Error> {
    let sql = if published {
        "UPDATE articles SET status = ?, published_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *"
    } else {
        "UPDATE articles SET status = ?, published_at = NULL, updated_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *"
    };
    let status = if published {
        ArticleStatus::Published
    } else {
        ArticleStatus::Draft
    };

    sqlx::query_as::<_, Article>(sql)
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Role, db::test_pool, db::users, models::sort::SortDirection};

    fn draft(title: &str) -> NewArticle {
        NewArticle {
            title: title.into(),
            preview: "preview".into(),
            content: "content".into(),
            image_url: None,
            tags: vec!["anxiety".into(), "sleep".into()],
            institution_id: None,
            psychologist_id: None,
        }
    }

    async fn author(pool: &SqlitePool) -> i64 {
        users::create(pool, "author@x.com", "h", Role::Editor)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_defaults_to_draft() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("First")).await.unwrap();

        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.views, 0);
        assert!(article.published_at.is_none());
        assert_eq!(article.tags.0, vec!["anxiety", "sleep"]);
    }

    #[tokio::test]
    async fn unknown_author_violates_foreign_key() {
        let pool = test_pool().await;
        let err = create(&pool, 42, &draft("Orphan")).await.unwrap_err();
        assert!(err
            .as_database_error()
            .map(|e| e.is_foreign_key_violation())
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn publish_cycle_keeps_published_at_in_step() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("Cycle")).await.unwrap();

        let published = set_published(&pool, article.id, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(published.status, ArticleStatus::Published);
        assert!(published.published_at.is_some());

        let unpublished = set_published(&pool, article.id, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unpublished.status, ArticleStatus::Draft);
        assert!(unpublished.published_at.is_none());

        let republished = set_published(&pool, article.id, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(republished.status, ArticleStatus::Published);
        assert!(republished.published_at.is_some());

        assert!(set_published(&pool, 999, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_published_counts_views_and_hides_drafts() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("Views")).await.unwrap();

        assert!(read_published(&pool, article.id).await.unwrap().is_none());

        set_published(&pool, article.id, true).await.unwrap();
        read_published(&pool, article.id).await.unwrap().unwrap();
        let second = read_published(&pool, article.id).await.unwrap().unwrap();
        assert_eq!(second.views, 2);
    }

    #[tokio::test]
    async fn update_is_partial() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("Before")).await.unwrap();

        let changes = UpdateArticle {
            title: Some("After".into()),
            tags: Some(vec!["grief".into()]),
            ..Default::default()
        };
        let updated = update(&pool, article.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.content, "content");
        assert_eq!(updated.tags.0, vec!["grief"]);

        assert!(update(&pool, 999, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let a = create(&pool, author_id, &draft("A")).await.unwrap();
        let b = create(&pool, author_id, &draft("B")).await.unwrap();
        create(&pool, author_id, &draft("C")).await.unwrap();

        set_published(&pool, a.id, true).await.unwrap();
        set_published(&pool, b.id, true).await.unwrap();
        read_published(&pool, a.id).await.unwrap();

        let by_views = SortParams {
            sort: Some(ArticleSortKey::Views),
            direction: Some(SortDirection::Asc),
        };
        let published = list(&pool, true, &by_views).await.unwrap();
        let titles: Vec<_> = published.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["B", "A"]);

        let all = list(&pool, false, &SortParams::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn deleting_author_cascades() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("Gone")).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(author_id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(find(&pool, article.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_institution_nulls_reference() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let institution_id: i64 =
            sqlx::query_scalar("INSERT INTO institutions (name) VALUES ('Clinic') RETURNING id")
                .fetch_one(&pool)
                .await
                .unwrap();

        let mut new = draft("Linked");
        new.institution_id = Some(institution_id);
        let article = create(&pool, author_id, &new).await.unwrap();
        assert_eq!(article.institution_id, Some(institution_id));

        sqlx::query("DELETE FROM institutions WHERE id = ?")
            .bind(institution_id)
            .execute(&pool)
            .await
            .unwrap();
        let article = find(&pool, article.id).await.unwrap().unwrap();
        assert_eq!(article.institution_id, None);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = test_pool().await;
        let author_id = author(&pool).await;
        let article = create(&pool, author_id, &draft("Once")).await.unwrap();

        assert!(delete(&pool, article.id).await.unwrap());
        assert!(!delete(&pool, article.id).await.unwrap());
    }
}
