//! The single query contest context resolution needs
//!
//! Resolution only ever asks "which contest has this primary key, if any".
//! Keeping that behind a trait lets the selector run against the database
//! pool or an in-memory [`EntityGraph`].

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::repositories::ContestRepository,
    error::AppResult,
    models::{Contest, EntityGraph},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestLookup: Send + Sync {
    /// Fetch the contest whose primary key is `id`, or `None`
    async fn find_contest(&self, id: i64) -> AppResult<Option<Contest>>;
}

#[async_trait]
impl ContestLookup for PgPool {
    async fn find_contest(&self, id: i64) -> AppResult<Option<Contest>> {
        ContestRepository::find_by_id(self, id).await
    }
}

#[async_trait]
impl ContestLookup for EntityGraph {
    async fn find_contest(&self, id: i64) -> AppResult<Option<Contest>> {
        Ok(self.contest(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils;
    use crate::models::NewContest;
    use crate::services::{ContestSelector, ContextService};
    use crate::AppError;

    #[tokio::test]
    async fn test_pool_lookup_found_and_missing() {
        let pool = test_utils::pool().await;
        let contest = ContestRepository::create(
            &pool,
            &NewContest::new(test_utils::unique("finals"), "Finals"),
        )
        .await
        .unwrap();

        let found = pool.find_contest(contest.id).await.unwrap();
        assert_eq!(found, Some(contest.clone()));
        assert_eq!(pool.find_contest(i64::MAX).await.unwrap(), None);

        let ctx = ContextService::select(&pool, ContestSelector::Id(contest.id))
            .await
            .unwrap();
        assert_eq!(ContextService::describe(&ctx), "Finals");

        let missing = ContextService::select(&pool, ContestSelector::Id(i64::MAX)).await;
        assert!(matches!(missing, Err(AppError::ContestNotFound(id)) if id == i64::MAX));
    }
}
