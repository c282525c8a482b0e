/// Recommendation data source abstraction
///
/// The query executor only ever talks to this trait. The production source
/// calls the remote recommendation service over HTTP; tests swap in mocks.
use crate::{
    error::AppResult,
    models::{Movie, MovieRequest, QueryDescriptor},
};

pub mod movie_api;

pub use movie_api::MovieApiProvider;

/// Trait for movie recommendation sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Movies matching the descriptor's genres under its match type
    ///
    /// Results come back in the order the service ranked them.
    async fn get_movies(&self, descriptor: &QueryDescriptor) -> AppResult<Vec<Movie>>;

    /// A random batch of movies, independent of any selection
    async fn random_movies(&self) -> AppResult<Vec<Movie>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Dispatches a request to the matching source call
pub async fn fetch(source: &dyn RecommendationSource, request: &MovieRequest) -> AppResult<Vec<Movie>> {
    match request {
        MovieRequest::Filtered(descriptor) => source.get_movies(descriptor).await,
        MovieRequest::Random => source.random_movies().await,
    }
}
