use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieRequest, QueryDescriptor},
    services::providers::{self, RecommendationSource},
};

/// Request lifecycle of the executor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Lifecycle {
    Idle,
    Loading { started_at: DateTime<Utc> },
    Ready { completed_at: DateTime<Utc> },
    /// The last query failed; the previous movies are still held
    Failed { error: String, failed_at: DateTime<Utc> },
}

impl Lifecycle {
    pub fn is_loading(&self) -> bool {
        matches!(self, Lifecycle::Loading { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Loading { .. } => "loading",
            Lifecycle::Ready { .. } => "ready",
            Lifecycle::Failed { .. } => "failed",
        }
    }
}

/// A started query whose HTTP call has not run yet
///
/// Holds no borrow of the executor, so the executor's lock can be released
/// while the call is in flight. Hand the outcome back with
/// [`QueryExecutor::complete`].
pub struct PendingQuery {
    source: Arc<dyn RecommendationSource>,
    request: MovieRequest,
}

impl std::fmt::Debug for PendingQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingQuery")
            .field("source", &self.source.name())
            .field("request", &self.request)
            .finish()
    }
}

impl PendingQuery {
    pub fn request(&self) -> &MovieRequest {
        &self.request
    }

    pub async fn execute(self) -> AppResult<Vec<Movie>> {
        providers::fetch(self.source.as_ref(), &self.request).await
    }
}

/// Runs movie queries one at a time and holds their results
pub struct QueryExecutor {
    source: Arc<dyn RecommendationSource>,
    lifecycle: Lifecycle,
    movies: Vec<Movie>,
}

impl QueryExecutor {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            source,
            lifecycle: Lifecycle::Idle,
            movies: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Movies from the last successful query, in server order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Moves the lifecycle to Loading, refusing while a query is in flight
    pub fn begin(&mut self, request: MovieRequest) -> AppResult<PendingQuery> {
        if self.lifecycle.is_loading() {
            tracing::warn!(kind = request.kind(), "Query rejected, another one is loading");
            return Err(AppError::Busy);
        }

        tracing::info!(kind = request.kind(), "Query started");
        self.lifecycle = Lifecycle::Loading {
            started_at: Utc::now(),
        };

        Ok(PendingQuery {
            source: self.source.clone(),
            request,
        })
    }

    /// Records the outcome of the in-flight query and leaves Loading
    pub fn complete(&mut self, outcome: AppResult<Vec<Movie>>) {
        match outcome {
            Ok(movies) => {
                tracing::info!(results = movies.len(), "Query completed");
                self.movies = movies;
                self.lifecycle = Lifecycle::Ready {
                    completed_at: Utc::now(),
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "Query failed");
                self.lifecycle = Lifecycle::Failed {
                    error: e.to_string(),
                    failed_at: Utc::now(),
                };
            }
        }
    }

    /// Fetches movies for the descriptor and returns the resulting lifecycle
    ///
    /// Fetch failures land in `Lifecycle::Failed`; the only error returned
    /// here is `Busy`.
    pub async fn run_filtered_query(&mut self, descriptor: QueryDescriptor) -> AppResult<Lifecycle> {
        self.run(MovieRequest::Filtered(descriptor)).await
    }

    /// Fetches a random batch of movies and returns the resulting lifecycle
    pub async fn run_random_query(&mut self) -> AppResult<Lifecycle> {
        self.run(MovieRequest::Random).await
    }

    async fn run(&mut self, request: MovieRequest) -> AppResult<Lifecycle> {
        let pending = self.begin(request)?;
        let guard = LoadingGuard {
            executor: &mut *self,
        };
        let outcome = pending.execute().await;
        guard.executor.complete(outcome);
        drop(guard);

        Ok(self.lifecycle.clone())
    }
}

/// Fails the query if the running future is dropped mid-flight
struct LoadingGuard<'a> {
    executor: &'a mut QueryExecutor,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.executor.lifecycle.is_loading() {
            self.executor.complete(Err(AppError::Internal(
                "query cancelled before completion".to_string(),
            )));
        }
    }
}
