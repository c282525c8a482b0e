use serde::Serialize;

use crate::error::{AppError, AppResult};

use super::MatchMode;

/// Separator between genre names inside the `genre` query parameter.
/// Form encoding turns it into the literal `%2C` on the wire.
pub const GENRE_SEPARATOR: &str = ",";

/// Serialized shape of a filtered movie query
///
/// Always holds at least one genre; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    genres: Vec<String>,
    match_type: MatchMode,
}

impl QueryDescriptor {
    /// Builds a descriptor, lower-casing genre names and keeping their order
    pub fn new<I, S>(genres: I, match_type: MatchMode) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let genres: Vec<String> = genres
            .into_iter()
            .map(|g| g.as_ref().to_lowercase())
            .collect();

        if genres.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one genre is required".to_string(),
            ));
        }

        Ok(Self { genres, match_type })
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn match_type(&self) -> MatchMode {
        self.match_type
    }

    /// Value of the `genre` parameter before URL encoding
    pub fn genre_param(&self) -> String {
        self.genres.join(GENRE_SEPARATOR)
    }

    /// Query pairs for `GET /get_movies`, in wire order
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("genre", self.genre_param()),
            ("match_type", self.match_type.as_str().to_string()),
        ]
    }
}

/// What the executor should ask the recommendation service for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieRequest {
    Filtered(QueryDescriptor),
    Random,
}

impl MovieRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            MovieRequest::Filtered(_) => "filtered",
            MovieRequest::Random => "random",
        }
    }
}
