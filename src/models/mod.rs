//! Domain models
//!
//! Rows of the contest database. Relationships are expressed as foreign-key
//! ids resolved by lookup; no model owns a pointer to its parent.

pub mod contest;
pub mod credential;
pub mod graph;
pub mod submission;
pub mod task;
pub mod user;

pub use contest::*;
pub use credential::*;
pub use graph::{EntityGraph, GraphError};
pub use submission::*;
pub use task::*;
pub use user::*;
