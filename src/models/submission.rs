//! Submission model and its evaluation artifacts
//!
//! Submissions are append-only: rows are never updated after creation, only
//! new tokens and results are attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Submission database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub participation_id: i64,
    pub task_id: i64,
    pub timestamp: DateTime<Utc>,
    /// Language tag, absent for output-only tasks
    pub language: Option<String>,
    pub comment: String,
    pub official: bool,
}

/// Data needed to create a submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSubmission {
    pub participation_id: i64,
    pub task_id: i64,
    pub timestamp: DateTime<Utc>,
    pub language: Option<String>,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub official: bool,
}

impl NewSubmission {
    pub fn new(participation_id: i64, task_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            participation_id,
            task_id,
            timestamp,
            language: None,
            comment: String::new(),
            official: false,
        }
    }
}

/// A submitted file
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub submission_id: i64,
    pub filename: String,
    /// Hex content hash; not unique across submissions
    pub digest: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFile {
    #[validate(length(min = 1))]
    pub filename: String,

    #[validate(length(min = 1))]
    pub digest: String,
}

/// A token played on a submission
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Token {
    pub id: i64,
    pub submission_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Evaluation of a submission against one dataset
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub id: i64,
    pub submission_id: i64,
    pub dataset_id: i64,
}
