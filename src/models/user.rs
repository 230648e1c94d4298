//! User, team and participation models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::constants::{MAX_TEAM_CODE_LENGTH, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};
use crate::models::PasswordCredential;

/// User database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// Stored as `method:payload`, never empty
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub timezone: Option<String>,
    /// Language codes, most preferred first
    pub preferred_languages: Vec<String>,
    /// Debug accounts hidden from rankings
    pub hidden: bool,
}

impl User {
    /// Parsed password credential
    pub fn credential(&self) -> Option<PasswordCredential> {
        self.password.parse().ok()
    }
}

/// Data needed to create a user
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub first_name: String,

    pub last_name: String,

    #[validate(length(min = MIN_USERNAME_LENGTH, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    pub password: PasswordCredential,

    #[validate(email)]
    pub email: Option<String>,

    pub timezone: Option<String>,

    #[validate(custom(function = "crate::utils::validation::language_tags"))]
    pub preferred_languages: Vec<String>,
}

/// Team database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    /// Unique short code
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = MAX_TEAM_CODE_LENGTH))]
    pub code: String,

    #[validate(length(min = 1))]
    pub name: String,
}

/// A user's enrollment in one contest
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Participation {
    pub id: i64,
    pub contest_id: i64,
    pub user_id: i64,
    pub team_id: Option<i64>,
    /// Address or subnet the participant may log in from
    pub ip: Option<String>,
    pub starting_time: Option<DateTime<Utc>>,
    /// Shift of the submission window, in seconds
    pub delay_time: Option<i64>,
    /// Additional time granted, in seconds
    pub extra_time: Option<i64>,
    /// Replaces the user's password for this contest only
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub hidden: bool,
    pub unrestricted: bool,
}

impl Participation {
    pub fn delay(&self) -> Duration {
        Duration::seconds(self.delay_time.unwrap_or(0))
    }

    pub fn extra(&self) -> Duration {
        Duration::seconds(self.extra_time.unwrap_or(0))
    }

    /// Credential used to log into this contest: the override, or the user's own.
    pub fn effective_password<'a>(&'a self, user: &'a User) -> &'a str {
        self.password.as_deref().unwrap_or(&user.password)
    }
}

/// Data needed to enroll a user in a contest
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewParticipation {
    pub contest_id: i64,
    pub user_id: i64,
    pub team_id: Option<i64>,
    pub ip: Option<String>,
    pub starting_time: Option<DateTime<Utc>>,

    #[validate(range(min = 0))]
    pub delay_time: Option<i64>,

    #[validate(range(min = 0))]
    pub extra_time: Option<i64>,

    pub password: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub unrestricted: bool,
}

impl NewParticipation {
    pub fn new(contest_id: i64, user_id: i64) -> Self {
        Self {
            contest_id,
            user_id,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            password: "plaintext:engine".to_string(),
            email: None,
            timezone: None,
            preferred_languages: vec![],
            hidden: false,
        }
    }

    fn participation(password: Option<&str>) -> Participation {
        Participation {
            id: 1,
            contest_id: 1,
            user_id: 1,
            team_id: None,
            ip: None,
            starting_time: None,
            delay_time: None,
            extra_time: Some(600),
            password: password.map(str::to_string),
            hidden: false,
            unrestricted: false,
        }
    }

    #[test]
    fn test_time_adjustments_default_to_zero() {
        let p = participation(None);
        assert_eq!(p.delay(), Duration::zero());
        assert_eq!(p.extra(), Duration::minutes(10));
    }

    #[test]
    fn test_participation_password_overrides_user() {
        let user = user();
        assert_eq!(participation(None).effective_password(&user), "plaintext:engine");
        assert_eq!(
            participation(Some("plaintext:contest")).effective_password(&user),
            "plaintext:contest"
        );
        assert!(user.credential().unwrap().verify("engine"));
    }

    #[test]
    fn test_bcrypt_password_written_by_existing_installations() {
        let user = User {
            password: format!("bcrypt:{}", bcrypt::hash("engine", 4).unwrap()),
            ..self::user()
        };

        let credential = user.credential().unwrap();
        assert!(credential.verify("engine"));

        let bare = User {
            password: "engine".to_string(),
            ..self::user()
        };
        assert!(bare.credential().is_none());
    }

    #[test]
    fn test_password_is_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "ada");
    }
}
