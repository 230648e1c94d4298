//! CWS - Contest Web Server core
//!
//! This library provides the persistence model and contest-context
//! resolution of a contest management platform.
//!
//! # Features
//!
//! - Database target resolution from the platform's shared cms.conf
//! - Relational domain model (contests, tasks, users, participations,
//!   submissions and their evaluation artifacts) with enforced invariants
//! - Single-contest (or "ALL") context resolution at startup
//! - Read-only HTTP exposure of the resolved contest
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Contest context resolution
//! - **Repositories**: Database access
//! - **Models**: Domain models and the in-memory entity graph

pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
