//! Application-wide constants
//!
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port (the contest web server port)
pub const DEFAULT_SERVER_PORT: u16 = 8888;

/// Default directory served under `/static`
pub const DEFAULT_STATIC_DIR: &str = "./static";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default upper bound for acquiring a connection or running the contest query
pub const DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Default number of attempts for startup database operations
pub const DEFAULT_DATABASE_CONNECT_ATTEMPTS: u32 = 3;

/// Default pause between two startup attempts
pub const DEFAULT_DATABASE_RETRY_BACKOFF_MS: u64 = 500;

// =============================================================================
// CMS CONFIGURATION
// =============================================================================

/// Environment variable overriding the cms.conf location
pub const CMS_CONFIG_ENV_VAR: &str = "CMS_CONFIG";

/// Locations probed for cms.conf, in order, after any explicit path
pub const DEFAULT_CMS_CONFIG_PATHS: &[&str] = &["/usr/local/etc/cms.conf", "/etc/cms.conf"];

// =============================================================================
// CONTEST SELECTION
// =============================================================================

/// Selector token meaning "no single contest is targeted"
pub const ALL_CONTESTS_SENTINEL: &str = "ALL";

// =============================================================================
// VALIDATION LIMITS
// =============================================================================

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 1;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 64;

/// Maximum contest name length
pub const MAX_CONTEST_NAME_LENGTH: u64 = 256;

/// Maximum task name length
pub const MAX_TASK_NAME_LENGTH: u64 = 128;

/// Maximum team code length
pub const MAX_TEAM_CODE_LENGTH: u64 = 64;

// =============================================================================
// PASSWORD CREDENTIALS
// =============================================================================

/// Password credential methods
pub mod credential_methods {
    pub const PLAINTEXT: &str = "plaintext";
    pub const BCRYPT: &str = "bcrypt";
    pub const ARGON2: &str = "argon2";

    pub const ALL: &[&str] = &[PLAINTEXT, BCRYPT, ARGON2];
}

/// Work factor for newly created bcrypt credentials
pub const BCRYPT_COST: u32 = 12;
