//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod contest_repo;
pub mod participation_repo;
pub mod submission_repo;
pub mod task_repo;
pub mod user_repo;

pub use contest_repo::ContestRepository;
pub use participation_repo::ParticipationRepository;
pub use submission_repo::SubmissionRepository;
pub use task_repo::TaskRepository;
pub use user_repo::UserRepository;
