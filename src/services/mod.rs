//! Business logic services

pub mod context_service;

pub use context_service::{ContestContext, ContestSelector, ContextService, RetryPolicy};
