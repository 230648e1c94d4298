//! Contest context service
//!
//! A serving process is scoped to one contest, or to none ("ALL"), for its
//! whole lifetime. The contest is resolved once at startup; afterwards the
//! resulting [`ContestContext`] is immutable and shared read-only.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    config::{ContextConfig, DatabaseConfig},
    constants::ALL_CONTESTS_SENTINEL,
    db::ContestLookup,
    error::{AppError, AppResult},
    models::Contest,
};

/// Zero-valued contest served when no single contest is selected
static PLACEHOLDER: Contest = Contest {
    id: 0,
    name: String::new(),
    description: String::new(),
};

/// Which contest the process was asked to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestSelector {
    All,
    Id(i64),
}

impl FromStr for ContestSelector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CONTESTS_SENTINEL {
            return Ok(Self::All);
        }
        s.parse::<i64>()
            .map(Self::Id)
            .map_err(|_| AppError::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for ContestSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CONTESTS_SENTINEL),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// The resolved contest context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContestContext {
    /// No single contest targeted; the placeholder contest is served
    All,
    /// The requested contest exists
    Contest(Contest),
    /// The requested contest does not exist and the operator chose to
    /// keep serving the placeholder
    Missing(i64),
}

impl ContestContext {
    /// The contest whose data is exposed; the placeholder unless found
    pub fn contest(&self) -> &Contest {
        match self {
            Self::Contest(contest) => contest,
            Self::All | Self::Missing(_) => &PLACEHOLDER,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Contest(_))
    }

    pub fn selector(&self) -> ContestSelector {
        match self {
            Self::All => ContestSelector::All,
            Self::Contest(contest) => ContestSelector::Id(contest.id),
            Self::Missing(id) => ContestSelector::Id(*id),
        }
    }
}

/// Bounds for the startup contest query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            attempts: config.connect_attempts.max(1),
            timeout: config.acquire_timeout,
            backoff: config.retry_backoff,
        }
    }
}

/// Contest context service for business logic
pub struct ContextService;

impl ContextService {
    /// Resolve `selector` against `lookup`.
    ///
    /// `All` never touches the store. A well-formed id with no row yields
    /// [`AppError::ContestNotFound`].
    pub async fn select<L>(lookup: &L, selector: ContestSelector) -> AppResult<ContestContext>
    where
        L: ContestLookup + ?Sized,
    {
        match selector {
            ContestSelector::All => Ok(ContestContext::All),
            ContestSelector::Id(id) => lookup
                .find_contest(id)
                .await?
                .map(ContestContext::Contest)
                .ok_or(AppError::ContestNotFound(id)),
        }
    }

    /// [`Self::select`] with each query bounded by `policy.timeout`.
    ///
    /// Only unavailability and timeouts are retried; after `policy.attempts`
    /// tries the failure is surfaced as [`AppError::DatabaseUnavailable`].
    pub async fn select_with_retry<L>(
        lookup: &L,
        selector: ContestSelector,
        policy: &RetryPolicy,
    ) -> AppResult<ContestContext>
    where
        L: ContestLookup + ?Sized,
    {
        let attempts = policy.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(policy.timeout, Self::select(lookup, selector)).await {
                Ok(Err(AppError::DatabaseUnavailable(e))) => last_error = e,
                Ok(result) => return result,
                Err(_) => last_error = format!("query timed out after {:?}", policy.timeout),
            }

            tracing::warn!(
                %selector,
                attempt,
                max_attempts = attempts,
                error = %last_error,
                "Contest lookup failed"
            );

            if attempt < attempts {
                tokio::time::sleep(policy.backoff).await;
            }
        }

        Err(AppError::DatabaseUnavailable(format!(
            "contest lookup failed after {attempts} attempts: {last_error}"
        )))
    }

    /// Startup resolution: bounded lookup plus the not-found policy.
    pub async fn resolve<L>(
        lookup: &L,
        selector: ContestSelector,
        policy: &RetryPolicy,
        context: &ContextConfig,
    ) -> AppResult<ContestContext>
    where
        L: ContestLookup + ?Sized,
    {
        match Self::select_with_retry(lookup, selector, policy).await {
            Ok(ctx) => {
                match &ctx {
                    ContestContext::Contest(contest) => tracing::info!(
                        contest_id = contest.id,
                        contest_name = %contest.name,
                        "Serving contest"
                    ),
                    _ => tracing::info!("No contest selected, serving placeholder"),
                }
                Ok(ctx)
            }
            Err(AppError::ContestNotFound(id)) if context.serve_missing_contest => {
                tracing::warn!(contest_id = id, "Contest not found, serving empty description");
                Ok(ContestContext::Missing(id))
            }
            Err(e) => Err(e),
        }
    }

    /// The contest description, verbatim
    pub fn describe(context: &ContestContext) -> &str {
        &context.contest().description
    }
}
