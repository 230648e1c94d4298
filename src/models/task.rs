//! Task, statement and dataset models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::constants::MAX_TASK_NAME_LENGTH;

/// Task database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    /// Position inside the contest; unique per contest
    pub num: Option<i32>,
    /// Owning contest, if the task is currently assigned to one
    pub contest_id: Option<i64>,
    /// Short name, unique across all tasks
    pub name: String,
    pub title: String,
    /// Filenames a submission must provide (e.g. `source.%l`)
    pub submission_format: Vec<String>,
    /// Language tags of the statements to highlight
    pub primary_statements: Vec<String>,
}

/// Data needed to create a task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTask {
    pub contest_id: Option<i64>,
    pub num: Option<i32>,

    #[validate(
        length(min = 1, max = MAX_TASK_NAME_LENGTH),
        custom(function = "crate::utils::validation::task_name")
    )]
    pub name: String,

    #[validate(length(min = 1))]
    pub title: String,

    #[serde(default)]
    pub submission_format: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validation::language_tags"))]
    pub primary_statements: Vec<String>,
}

/// Statement of a task in one language
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Statement {
    pub id: i64,
    pub task_id: i64,
    pub language: String,
    pub digest: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStatement {
    pub task_id: i64,

    #[validate(custom(function = "crate::utils::validation::language_tag"))]
    pub language: String,

    #[validate(length(min = 1))]
    pub digest: String,
}

/// Test-data configuration a task's submissions are evaluated against
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Dataset {
    pub id: i64,
    pub task_id: i64,
    /// Unique per task
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDataset {
    pub task_id: i64,

    #[validate(length(min = 1))]
    pub description: String,
}
