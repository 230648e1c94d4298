//! Database module
//!
//! Connection target resolution, pool management, migrations, the contest
//! lookup seam and repositories.

pub mod connection;
pub mod dsn;
pub mod lookup;
pub mod repositories;

#[cfg(test)]
pub(crate) mod test_utils;

use sqlx::PgPool;

pub use connection::*;
pub use dsn::{resolve, ConfigParseError, ConnectionConfig};
pub use lookup::ContestLookup;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
