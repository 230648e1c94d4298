//! Submission repository
//!
//! Submissions are append-only: there is no update or delete here, only
//! creation and the attachment of tokens and results.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{File, NewFile, NewSubmission, Submission, SubmissionResult, Token},
};

const SUBMISSION_COLUMNS: &str =
    "id, participation_id, task_id, timestamp, language, comment, official";

/// Repository for submission database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a submission and its files in one transaction.
    ///
    /// The task must belong to the contest of the participation.
    pub async fn create(
        pool: &PgPool,
        new: &NewSubmission,
        files: &[NewFile],
    ) -> AppResult<(Submission, Vec<File>)> {
        new.validate()?;
        for file in files {
            file.validate()?;
        }

        let mut tx = pool.begin().await?;

        let same_contest: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT t.contest_id IS NOT DISTINCT FROM p.contest_id
            FROM participations p, tasks t
            WHERE p.id = $1 AND t.id = $2
            "#,
        )
        .bind(new.participation_id)
        .bind(new.task_id)
        .fetch_optional(&mut *tx)
        .await?;

        match same_contest {
            None => {
                return Err(AppError::InvalidReference(format!(
                    "participation {} or task {} does not exist",
                    new.participation_id, new.task_id
                )));
            }
            Some(false) => {
                return Err(AppError::InvalidReference(format!(
                    "task {} is not part of the contest of participation {}",
                    new.task_id, new.participation_id
                )));
            }
            Some(true) => {}
        }

        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"
            INSERT INTO submissions (participation_id, task_id, timestamp, language, comment, official)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(new.participation_id)
        .bind(new.task_id)
        .bind(new.timestamp)
        .bind(&new.language)
        .bind(&new.comment)
        .bind(new.official)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let row = sqlx::query_as::<_, File>(
                r#"
                INSERT INTO files (submission_id, filename, digest)
                VALUES ($1, $2, $3)
                RETURNING id, submission_id, filename, digest
                "#,
            )
            .bind(submission.id)
            .bind(&file.filename)
            .bind(&file.digest)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;

        tracing::debug!(
            submission_id = submission.id,
            participation_id = submission.participation_id,
            files = stored.len(),
            "Submission stored"
        );

        Ok((submission, stored))
    }

    /// Submissions of a participation, oldest first
    pub async fn list_for_participation(
        pool: &PgPool,
        participation_id: i64,
    ) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE participation_id = $1 ORDER BY timestamp, id"
        ))
        .bind(participation_id)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Files of a submission
    pub async fn list_files(pool: &PgPool, submission_id: i64) -> AppResult<Vec<File>> {
        let files = sqlx::query_as::<_, File>(
            r#"SELECT id, submission_id, filename, digest FROM files WHERE submission_id = $1 ORDER BY filename"#,
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await?;

        Ok(files)
    }

    /// Play a token on a submission
    pub async fn add_token(
        pool: &PgPool,
        submission_id: i64,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Token> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (submission_id, timestamp)
            VALUES ($1, $2)
            RETURNING id, submission_id, timestamp
            "#,
        )
        .bind(submission_id)
        .bind(timestamp)
        .fetch_one(pool)
        .await?;

        Ok(token)
    }

    /// Attach an evaluation result for a dataset of the submission's task
    pub async fn add_result(
        pool: &PgPool,
        submission_id: i64,
        dataset_id: i64,
    ) -> AppResult<SubmissionResult> {
        let result = sqlx::query_as::<_, SubmissionResult>(
            r#"
            INSERT INTO submission_results (submission_id, dataset_id)
            SELECT s.id, d.id
            FROM submissions s
            JOIN datasets d ON d.task_id = s.task_id
            WHERE s.id = $1 AND d.id = $2
            RETURNING id, submission_id, dataset_id
            "#,
        )
        .bind(submission_id)
        .bind(dataset_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::InvalidReference(format!(
                "dataset {dataset_id} does not evaluate the task of submission {submission_id}"
            ))
        })?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ContestRepository, TaskRepository};
    use crate::db::test_utils;
    use crate::models::{NewContest, NewDataset};
    use crate::utils::crypto::digest_bytes;

    fn source(filename: &str, contents: &[u8]) -> NewFile {
        NewFile {
            filename: filename.to_string(),
            digest: digest_bytes(contents),
        }
    }

    #[tokio::test]
    async fn test_create_with_files() {
        let pool = test_utils::pool().await;
        let (_, task, participation) = test_utils::seed(&pool).await;

        let (submission, files) = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, task.id, Utc::now()),
            &[source("source.cpp", b"int main() {}")],
        )
        .await
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(
            SubmissionRepository::list_files(&pool, submission.id).await.unwrap(),
            files
        );
        let listed = SubmissionRepository::list_for_participation(&pool, participation.id)
            .await
            .unwrap();
        assert_eq!(listed, vec![submission]);
    }

    #[tokio::test]
    async fn test_task_of_another_contest_is_rejected() {
        let pool = test_utils::pool().await;
        let (_, _, participation) = test_utils::seed(&pool).await;
        let other = ContestRepository::create(
            &pool,
            &NewContest::new(test_utils::unique("other"), ""),
        )
        .await
        .unwrap();
        let foreign = TaskRepository::create(&pool, &test_utils::new_task(other.id, 0))
            .await
            .unwrap();

        let result = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, foreign.id, Utc::now()),
            &[source("source.cpp", b"")],
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidReference(_))));

        let missing = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, i64::MAX, Utc::now()),
            &[],
        )
        .await;
        assert!(matches!(missing, Err(AppError::InvalidReference(_))));

        let listed = SubmissionRepository::list_for_participation(&pool, participation.id)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_filename_rolls_back() {
        let pool = test_utils::pool().await;
        let (_, task, participation) = test_utils::seed(&pool).await;

        let result = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, task.id, Utc::now()),
            &[source("a.cpp", b"1"), source("a.cpp", b"2")],
        )
        .await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));

        let listed = SubmissionRepository::list_for_participation(&pool, participation.id)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_submissions_are_append_only() {
        let pool = test_utils::pool().await;
        let (_, task, participation) = test_utils::seed(&pool).await;
        let (submission, _) = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, task.id, Utc::now()),
            &[],
        )
        .await
        .unwrap();

        let update = sqlx::query("UPDATE submissions SET comment = 'edited' WHERE id = $1")
            .bind(submission.id)
            .execute(&pool)
            .await;
        let err = AppError::from(update.unwrap_err());
        assert!(err.to_string().contains("cannot be updated"), "{err}");

        let first = SubmissionRepository::add_token(&pool, submission.id, Utc::now())
            .await
            .unwrap();
        let second = SubmissionRepository::add_token(&pool, submission.id, Utc::now())
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_result_dataset_must_belong_to_task() {
        let pool = test_utils::pool().await;
        let (contest, task, participation) = test_utils::seed(&pool).await;
        let other_task = TaskRepository::create(&pool, &test_utils::new_task(contest.id, 1))
            .await
            .unwrap();
        let dataset = TaskRepository::add_dataset(
            &pool,
            &NewDataset {
                task_id: task.id,
                description: "default".to_string(),
            },
        )
        .await
        .unwrap();
        let foreign_dataset = TaskRepository::add_dataset(
            &pool,
            &NewDataset {
                task_id: other_task.id,
                description: "default".to_string(),
            },
        )
        .await
        .unwrap();
        let (submission, _) = SubmissionRepository::create(
            &pool,
            &NewSubmission::new(participation.id, task.id, Utc::now()),
            &[],
        )
        .await
        .unwrap();

        let result = SubmissionRepository::add_result(&pool, submission.id, dataset.id)
            .await
            .unwrap();
        assert_eq!(result.dataset_id, dataset.id);

        let again = SubmissionRepository::add_result(&pool, submission.id, dataset.id).await;
        assert!(matches!(again, Err(AppError::AlreadyExists(_))));

        let foreign =
            SubmissionRepository::add_result(&pool, submission.id, foreign_dataset.id).await;
        assert!(matches!(foreign, Err(AppError::InvalidReference(_))));
    }
}
