//! Contest repository

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{Contest, NewContest},
};

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Create a new contest
    pub async fn create(pool: &PgPool, new: &NewContest) -> AppResult<Contest> {
        new.validate()?;

        let contest = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(pool)
        .await?;

        Ok(contest)
    }

    /// Find contest by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"SELECT id, name, description FROM contests WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(contest)
    }

    /// Find contest by its unique name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"SELECT id, name, description FROM contests WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(contest)
    }

    /// List all contests ordered by id
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"SELECT id, name, description FROM contests ORDER BY id"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(contests)
    }

    /// Count total contests
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM contests"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
