//! PostgreSQL container shared by the repository tests
//!
//! The container is started lazily on first use and reused by every test in
//! the process. Each test opens its own pool, since pools are bound to the
//! runtime that created them.

use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use crate::db::repositories::{
    ContestRepository, ParticipationRepository, TaskRepository, UserRepository,
};
use crate::models::{
    Contest, NewContest, NewParticipation, NewTask, NewUser, Participation, PasswordCredential,
    Task,
};

struct SharedPostgres {
    _container: ContainerAsync<Postgres>,
    url: String,
}

static POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Connection URL of the shared container, starting it if needed
pub async fn postgres_url() -> &'static str {
    let shared = POSTGRES
        .get_or_init(|| async {
            let container = Postgres::default()
                .with_user("cms")
                .with_password("cms_test")
                .with_db_name("cms_test")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            SharedPostgres {
                _container: container,
                url: format!("postgresql://cms:cms_test@{host}:{port}/cms_test"),
            }
        })
        .await;
    &shared.url
}

/// A migrated pool against the shared container
pub async fn pool() -> PgPool {
    let pool = PgPool::connect(postgres_url().await)
        .await
        .expect("Failed to connect to test database");
    crate::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Name unique within the test process; tests share one database
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

pub fn new_user(username: String) -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        username,
        password: PasswordCredential::plaintext("pw").unwrap(),
        email: None,
        timezone: None,
        preferred_languages: vec!["en".to_string()],
    }
}

pub fn new_task(contest_id: i64, num: i32) -> NewTask {
    NewTask {
        contest_id: Some(contest_id),
        num: Some(num),
        name: unique("task"),
        title: "Task".to_string(),
        submission_format: vec!["source.%l".to_string()],
        primary_statements: vec![],
    }
}

/// A fresh contest with one task and one enrolled user
pub async fn seed(pool: &PgPool) -> (Contest, Task, Participation) {
    let contest = ContestRepository::create(pool, &NewContest::new(unique("contest"), "Finals"))
        .await
        .unwrap();
    let task = TaskRepository::create(pool, &new_task(contest.id, 0))
        .await
        .unwrap();
    let user = UserRepository::create(pool, &new_user(unique("user")))
        .await
        .unwrap();
    let participation =
        ParticipationRepository::create(pool, &NewParticipation::new(contest.id, user.id))
            .await
            .unwrap();

    (contest, task, participation)
}
