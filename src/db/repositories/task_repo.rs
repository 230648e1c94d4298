//! Task, statement and dataset repository

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{Dataset, NewDataset, NewStatement, NewTask, Statement, Task},
};

const TASK_COLUMNS: &str =
    "id, num, contest_id, name, title, submission_format, primary_statements";

/// Repository for task database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Create a new task
    pub async fn create(pool: &PgPool, new: &NewTask) -> AppResult<Task> {
        new.validate()?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (num, contest_id, name, title, submission_format, primary_statements)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(new.num)
        .bind(new.contest_id)
        .bind(&new.name)
        .bind(&new.title)
        .bind(&new.submission_format)
        .bind(&new.primary_statements)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Find task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Tasks of a contest in contest order
    pub async fn list_for_contest(pool: &PgPool, contest_id: i64) -> AppResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE contest_id = $1 ORDER BY num"
        ))
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Add a statement to a task
    pub async fn add_statement(pool: &PgPool, new: &NewStatement) -> AppResult<Statement> {
        new.validate()?;

        let statement = sqlx::query_as::<_, Statement>(
            r#"
            INSERT INTO statements (task_id, language, digest)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, language, digest
            "#,
        )
        .bind(new.task_id)
        .bind(&new.language)
        .bind(&new.digest)
        .fetch_one(pool)
        .await?;

        Ok(statement)
    }

    /// Statements of a task
    pub async fn list_statements(pool: &PgPool, task_id: i64) -> AppResult<Vec<Statement>> {
        let statements = sqlx::query_as::<_, Statement>(
            r#"SELECT id, task_id, language, digest FROM statements WHERE task_id = $1 ORDER BY language"#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(statements)
    }

    /// Add a dataset to a task
    pub async fn add_dataset(pool: &PgPool, new: &NewDataset) -> AppResult<Dataset> {
        new.validate()?;

        let dataset = sqlx::query_as::<_, Dataset>(
            r#"
            INSERT INTO datasets (task_id, description)
            VALUES ($1, $2)
            RETURNING id, task_id, description
            "#,
        )
        .bind(new.task_id)
        .bind(&new.description)
        .fetch_one(pool)
        .await?;

        Ok(dataset)
    }
}
