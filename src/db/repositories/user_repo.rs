//! User and team repository

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{NewTeam, NewUser, Team, User},
};

const USER_COLUMNS: &str = "id, first_name, last_name, username, password, email, timezone, \
                            preferred_languages, hidden";

/// Repository for user and team database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, new: &NewUser) -> AppResult<User> {
        new.validate()?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                first_name, last_name, username, password, email, timezone, preferred_languages
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.username)
        .bind(new.password.to_string())
        .bind(&new.email)
        .bind(&new.timezone)
        .bind(&new.preferred_languages)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Create a new team
    pub async fn create_team(pool: &PgPool, new: &NewTeam) -> AppResult<Team> {
        new.validate()?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (code, name)
            VALUES ($1, $2)
            RETURNING id, code, name
            "#,
        )
        .bind(&new.code)
        .bind(&new.name)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Find team by code
    pub async fn find_team_by_code(pool: &PgPool, code: &str) -> AppResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(r#"SELECT id, code, name FROM teams WHERE code = $1"#)
            .bind(code)
            .fetch_optional(pool)
            .await?;

        Ok(team)
    }
}
