//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::{constants::ALL_CONTESTS_SENTINEL, error::AppResult, services::ContestSelector};

#[derive(Debug, Parser)]
#[command(name = "cws", version, about = "Contest web server")]
pub struct Args {
    /// The numeric contest ID or the 'ALL' string
    #[arg(short = 'c', long = "contest", default_value = ALL_CONTESTS_SENTINEL)]
    pub contest: String,

    /// Path to cms.conf (otherwise CMS_CONFIG, then the system locations)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The contest selector. A malformed identifier is fatal.
    pub fn selector(&self) -> AppResult<ContestSelector> {
        self.contest.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_defaults_to_all() {
        let args = Args::try_parse_from(["cws"]).unwrap();
        assert_eq!(args.selector().unwrap(), ContestSelector::All);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_contest_flag() {
        let args = Args::try_parse_from(["cws", "-c", "42", "--config", "/tmp/cms.conf"]).unwrap();
        assert_eq!(args.selector().unwrap(), ContestSelector::Id(42));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/cms.conf")));
    }

    #[test]
    fn test_invalid_contest_flag() {
        let args = Args::try_parse_from(["cws", "--contest", "abc"]).unwrap();
        assert!(matches!(args.selector(), Err(AppError::InvalidIdentifier(_))));
    }
}
