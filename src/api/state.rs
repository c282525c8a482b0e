use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{MovieApiProvider, QueryExecutor, RecommendationSource, SelectionController};

/// Shared application state
///
/// Holds a single session: every client sees and mutates the same selection
/// and results. Meant for one user running the backend locally.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// One browsing session: the genre selection and the query results
pub struct AppStateInner {
    pub selection: SelectionController,
    pub executor: QueryExecutor,
}

impl AppState {
    /// Creates a fresh session backed by the given recommendation source
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                selection: SelectionController::new(),
                executor: QueryExecutor::new(source),
            })),
        }
    }

    /// Creates a session talking to the configured recommendation service
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider =
            MovieApiProvider::new(config.recommender_api_url.clone(), config.request_timeout())?;
        Ok(Self::new(Arc::new(provider)))
    }
}
