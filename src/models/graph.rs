//! In-memory entity graph
//!
//! An arena of tables keyed by id, with explicit foreign-key fields on every
//! child row. Every insertion checks the same referential and uniqueness
//! constraints the database schema declares, so a graph built through this
//! API never contains an orphan or a duplicate enrollment. Ids are assigned
//! per table, start at 1 and are never reused.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::{
    Contest, Dataset, File, NewContest, NewDataset, NewFile, NewParticipation, NewStatement,
    NewSubmission, NewTask, NewTeam, NewUser, Participation, Statement, Submission,
    SubmissionResult, Task, Team, Token, User,
};

/// Constraint violations detected while inserting into the graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("{entity} with {key} already exists")]
    Duplicate { entity: &'static str, key: String },

    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("task {task_id} is not part of the contest of participation {participation_id}")]
    CrossContest { task_id: i64, participation_id: i64 },

    #[error("invalid data: {0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for GraphError {
    fn from(err: validator::ValidationErrors) -> Self {
        GraphError::Invalid(err.to_string())
    }
}

/// One table of the arena
#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn require(&self, entity: &'static str, id: i64) -> Result<&T, GraphError> {
        self.rows
            .get(&id)
            .ok_or(GraphError::MissingReference { entity, id })
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

/// The whole contest entity graph
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    contests: Table<Contest>,
    tasks: Table<Task>,
    statements: Table<Statement>,
    datasets: Table<Dataset>,
    teams: Table<Team>,
    users: Table<User>,
    participations: Table<Participation>,
    submissions: Table<Submission>,
    files: Table<File>,
    tokens: Table<Token>,
    results: Table<SubmissionResult>,
}

fn duplicate(entity: &'static str, key: impl Into<String>) -> GraphError {
    GraphError::Duplicate {
        entity,
        key: key.into(),
    }
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Contests and tasks
    // =========================================================================

    pub fn add_contest(&mut self, new: NewContest) -> Result<Contest, GraphError> {
        new.validate()?;
        if self.contests.values().any(|c| c.name == new.name) {
            return Err(duplicate("contest", format!("name {:?}", new.name)));
        }

        Ok(self.contests.insert_with(|id| Contest {
            id,
            name: new.name,
            description: new.description,
        }))
    }

    pub fn add_task(&mut self, new: NewTask) -> Result<Task, GraphError> {
        new.validate()?;
        if let Some(contest_id) = new.contest_id {
            self.contests.require("contest", contest_id)?;
        }
        if self.tasks.values().any(|t| t.name == new.name) {
            return Err(duplicate("task", format!("name {:?}", new.name)));
        }
        if let (Some(contest_id), Some(num)) = (new.contest_id, new.num) {
            if self
                .tasks
                .values()
                .any(|t| t.contest_id == Some(contest_id) && t.num == Some(num))
            {
                return Err(duplicate(
                    "task",
                    format!("num {num} in contest {contest_id}"),
                ));
            }
        }

        Ok(self.tasks.insert_with(|id| Task {
            id,
            num: new.num,
            contest_id: new.contest_id,
            name: new.name,
            title: new.title,
            submission_format: new.submission_format,
            primary_statements: new.primary_statements,
        }))
    }

    pub fn add_statement(&mut self, new: NewStatement) -> Result<Statement, GraphError> {
        new.validate()?;
        self.tasks.require("task", new.task_id)?;
        if self
            .statements
            .values()
            .any(|s| s.task_id == new.task_id && s.language == new.language)
        {
            return Err(duplicate(
                "statement",
                format!("language {:?} for task {}", new.language, new.task_id),
            ));
        }

        Ok(self.statements.insert_with(|id| Statement {
            id,
            task_id: new.task_id,
            language: new.language,
            digest: new.digest,
        }))
    }

    pub fn add_dataset(&mut self, new: NewDataset) -> Result<Dataset, GraphError> {
        new.validate()?;
        self.tasks.require("task", new.task_id)?;
        if self
            .datasets
            .values()
            .any(|d| d.task_id == new.task_id && d.description == new.description)
        {
            return Err(duplicate(
                "dataset",
                format!("description {:?} for task {}", new.description, new.task_id),
            ));
        }

        Ok(self.datasets.insert_with(|id| Dataset {
            id,
            task_id: new.task_id,
            description: new.description,
        }))
    }

    // =========================================================================
    // Users, teams and participations
    // =========================================================================

    pub fn add_team(&mut self, new: NewTeam) -> Result<Team, GraphError> {
        new.validate()?;
        if self.teams.values().any(|t| t.code == new.code) {
            return Err(duplicate("team", format!("code {:?}", new.code)));
        }

        Ok(self.teams.insert_with(|id| Team {
            id,
            code: new.code,
            name: new.name,
        }))
    }

    pub fn add_user(&mut self, new: NewUser) -> Result<User, GraphError> {
        new.validate()?;
        if self.users.values().any(|u| u.username == new.username) {
            return Err(duplicate("user", format!("username {:?}", new.username)));
        }

        Ok(self.users.insert_with(|id| User {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            password: new.password.to_string(),
            email: new.email,
            timezone: new.timezone,
            preferred_languages: new.preferred_languages,
            hidden: false,
        }))
    }

    /// Enroll a user in a contest. A user participates in a contest at most once.
    pub fn add_participation(
        &mut self,
        new: NewParticipation,
    ) -> Result<Participation, GraphError> {
        new.validate()?;
        self.contests.require("contest", new.contest_id)?;
        self.users.require("user", new.user_id)?;
        if let Some(team_id) = new.team_id {
            self.teams.require("team", team_id)?;
        }
        if self
            .participations
            .values()
            .any(|p| p.contest_id == new.contest_id && p.user_id == new.user_id)
        {
            return Err(duplicate(
                "participation",
                format!("user {} in contest {}", new.user_id, new.contest_id),
            ));
        }

        Ok(self.participations.insert_with(|id| Participation {
            id,
            contest_id: new.contest_id,
            user_id: new.user_id,
            team_id: new.team_id,
            ip: new.ip,
            starting_time: new.starting_time,
            delay_time: new.delay_time,
            extra_time: new.extra_time,
            password: new.password,
            hidden: new.hidden,
            unrestricted: new.unrestricted,
        }))
    }

    /// Participations are never removed, only hidden.
    pub fn hide_participation(&mut self, id: i64) -> Result<(), GraphError> {
        let participation = self
            .participations
            .rows
            .get_mut(&id)
            .ok_or(GraphError::MissingReference {
                entity: "participation",
                id,
            })?;
        participation.hidden = true;
        Ok(())
    }

    // =========================================================================
    // Submissions (append-only)
    // =========================================================================

    /// Record a submission together with its files.
    ///
    /// The task must belong to the contest the participation is enrolled in.
    /// Nothing is inserted if any check fails.
    pub fn add_submission(
        &mut self,
        new: NewSubmission,
        files: Vec<NewFile>,
    ) -> Result<(Submission, Vec<File>), GraphError> {
        new.validate()?;
        for file in &files {
            file.validate()?;
        }
        let participation = self
            .participations
            .require("participation", new.participation_id)?;
        let task = self.tasks.require("task", new.task_id)?;
        if task.contest_id != Some(participation.contest_id) {
            return Err(GraphError::CrossContest {
                task_id: task.id,
                participation_id: participation.id,
            });
        }
        for (i, file) in files.iter().enumerate() {
            if files[..i].iter().any(|f| f.filename == file.filename) {
                return Err(duplicate("file", format!("filename {:?}", file.filename)));
            }
        }

        let submission = self.submissions.insert_with(|id| Submission {
            id,
            participation_id: new.participation_id,
            task_id: new.task_id,
            timestamp: new.timestamp,
            language: new.language,
            comment: new.comment,
            official: new.official,
        });
        let files = files
            .into_iter()
            .map(|file| {
                self.files.insert_with(|id| File {
                    id,
                    submission_id: submission.id,
                    filename: file.filename,
                    digest: file.digest,
                })
            })
            .collect();

        Ok((submission, files))
    }

    pub fn add_token(
        &mut self,
        submission_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<Token, GraphError> {
        self.submissions.require("submission", submission_id)?;

        Ok(self.tokens.insert_with(|id| Token {
            id,
            submission_id,
            timestamp,
        }))
    }

    /// Attach an evaluation result. One result per (submission, dataset).
    pub fn add_result(
        &mut self,
        submission_id: i64,
        dataset_id: i64,
    ) -> Result<SubmissionResult, GraphError> {
        let submission = self.submissions.require("submission", submission_id)?;
        let dataset = self.datasets.require("dataset", dataset_id)?;
        if dataset.task_id != submission.task_id {
            return Err(GraphError::Invalid(format!(
                "dataset {dataset_id} belongs to task {}, submission {submission_id} to task {}",
                dataset.task_id, submission.task_id
            )));
        }
        if self
            .results
            .values()
            .any(|r| r.submission_id == submission_id && r.dataset_id == dataset_id)
        {
            return Err(duplicate(
                "submission result",
                format!("submission {submission_id} and dataset {dataset_id}"),
            ));
        }

        Ok(self.results.insert_with(|id| SubmissionResult {
            id,
            submission_id,
            dataset_id,
        }))
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn contest(&self, id: i64) -> Option<&Contest> {
        self.contests.get(id)
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.get(id)
    }

    pub fn participation(&self, id: i64) -> Option<&Participation> {
        self.participations.get(id)
    }

    pub fn submission(&self, id: i64) -> Option<&Submission> {
        self.submissions.get(id)
    }

    pub fn contests(&self) -> impl Iterator<Item = &Contest> {
        self.contests.values()
    }

    /// Tasks of a contest ordered by `num`
    pub fn tasks_of(&self, contest_id: i64) -> Vec<&Task> {
        let mut tasks: Vec<_> = self
            .tasks
            .values()
            .filter(|t| t.contest_id == Some(contest_id))
            .collect();
        tasks.sort_by_key(|t| t.num);
        tasks
    }

    pub fn statements_of(&self, task_id: i64) -> impl Iterator<Item = &Statement> {
        self.statements.values().filter(move |s| s.task_id == task_id)
    }

    pub fn participations_of(&self, contest_id: i64) -> impl Iterator<Item = &Participation> {
        self.participations
            .values()
            .filter(move |p| p.contest_id == contest_id)
    }

    pub fn submissions_of(&self, participation_id: i64) -> impl Iterator<Item = &Submission> {
        self.submissions
            .values()
            .filter(move |s| s.participation_id == participation_id)
    }

    pub fn files_of(&self, submission_id: i64) -> impl Iterator<Item = &File> {
        self.files
            .values()
            .filter(move |f| f.submission_id == submission_id)
    }

    pub fn tokens_of(&self, submission_id: i64) -> impl Iterator<Item = &Token> {
        self.tokens
            .values()
            .filter(move |t| t.submission_id == submission_id)
    }

    pub fn results_of(&self, submission_id: i64) -> impl Iterator<Item = &SubmissionResult> {
        self.results
            .values()
            .filter(move |r| r.submission_id == submission_id)
    }

    /// Check that every foreign key in the graph resolves.
    pub fn check_references(&self) -> Result<(), GraphError> {
        for task in self.tasks.values() {
            if let Some(contest_id) = task.contest_id {
                self.contests.require("contest", contest_id)?;
            }
        }
        for statement in self.statements.values() {
            self.tasks.require("task", statement.task_id)?;
        }
        for dataset in self.datasets.values() {
            self.tasks.require("task", dataset.task_id)?;
        }
        for p in self.participations.values() {
            self.contests.require("contest", p.contest_id)?;
            self.users.require("user", p.user_id)?;
            if let Some(team_id) = p.team_id {
                self.teams.require("team", team_id)?;
            }
        }
        for s in self.submissions.values() {
            self.participations.require("participation", s.participation_id)?;
            self.tasks.require("task", s.task_id)?;
        }
        for f in self.files.values() {
            self.submissions.require("submission", f.submission_id)?;
        }
        for t in self.tokens.values() {
            self.submissions.require("submission", t.submission_id)?;
        }
        for r in self.results.values() {
            self.submissions.require("submission", r.submission_id)?;
            self.datasets.require("dataset", r.dataset_id)?;
        }
        Ok(())
    }
}
