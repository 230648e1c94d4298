//! Participation repository
//!
//! Participations are never deleted, only hidden.

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{NewParticipation, Participation},
};

const PARTICIPATION_COLUMNS: &str = "id, contest_id, user_id, team_id, ip, starting_time, \
                                     delay_time, extra_time, password, hidden, unrestricted";

/// Repository for participation database operations
pub struct ParticipationRepository;

impl ParticipationRepository {
    /// Enroll a user in a contest.
    ///
    /// A second enrollment of the same user fails with `AlreadyExists`.
    pub async fn create(pool: &PgPool, new: &NewParticipation) -> AppResult<Participation> {
        new.validate()?;

        let participation = sqlx::query_as::<_, Participation>(&format!(
            r#"
            INSERT INTO participations (
                contest_id, user_id, team_id, ip, starting_time, delay_time, extra_time,
                password, hidden, unrestricted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(new.contest_id)
        .bind(new.user_id)
        .bind(new.team_id)
        .bind(&new.ip)
        .bind(new.starting_time)
        .bind(new.delay_time)
        .bind(new.extra_time)
        .bind(&new.password)
        .bind(new.hidden)
        .bind(new.unrestricted)
        .fetch_one(pool)
        .await?;

        Ok(participation)
    }

    /// Find the participation of a user in a contest
    pub async fn find(
        pool: &PgPool,
        contest_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Participation>> {
        let participation = sqlx::query_as::<_, Participation>(&format!(
            "SELECT {PARTICIPATION_COLUMNS} FROM participations WHERE contest_id = $1 AND user_id = $2"
        ))
        .bind(contest_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(participation)
    }

    /// Participations of a contest
    pub async fn list_for_contest(
        pool: &PgPool,
        contest_id: i64,
        include_hidden: bool,
    ) -> AppResult<Vec<Participation>> {
        let participations = sqlx::query_as::<_, Participation>(&format!(
            r#"
            SELECT {PARTICIPATION_COLUMNS} FROM participations
            WHERE contest_id = $1 AND ($2 OR NOT hidden)
            ORDER BY id
            "#
        ))
        .bind(contest_id)
        .bind(include_hidden)
        .fetch_all(pool)
        .await?;

        Ok(participations)
    }

    /// Hide a participation
    pub async fn hide(pool: &PgPool, id: i64) -> AppResult<()> {
        let result = sqlx::query(r#"UPDATE participations SET hidden = TRUE WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Participation {id} not found")));
        }

        Ok(())
    }
}
