//! Application state management
//!
//! The shared state is built once, after the contest context has been
//! resolved, and is read-only afterwards. Handlers receive it through
//! Axum's State extractor.

use std::sync::Arc;

use crate::config::Config;
use crate::services::ContestContext;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Contest this process serves
    context: ContestContext,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(context: ContestContext, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { context, config }),
        }
    }

    /// Get a reference to the resolved contest context
    pub fn context(&self) -> &ContestContext {
        &self.inner.context
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
