//! Contest model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::constants::MAX_CONTEST_NAME_LENGTH;

/// Contest database model
///
/// `Contest::default()` is the zero-valued placeholder used when no single
/// contest is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Data needed to create a contest
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewContest {
    #[validate(length(min = 1, max = MAX_CONTEST_NAME_LENGTH))]
    pub name: String,

    pub description: String,
}

impl NewContest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
