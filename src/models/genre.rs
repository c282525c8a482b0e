use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// A genre from the fixed recommendation catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    TvMovie,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Display name as the recommendation service knows it
    pub fn name(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::TvMovie => "TV Movie",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Documentary and TV Movie are too sparse to combine with anything else
    pub fn is_special(self) -> bool {
        matches!(self, Genre::Documentary | Genre::TvMovie)
    }

    /// Number of catalog movies carrying this genre
    pub fn known_count(self) -> u32 {
        GENRE_CATALOG
            .iter()
            .find(|entry| entry.genre == self)
            .map(|entry| entry.known_count)
            .unwrap_or(0)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GENRE_CATALOG
            .iter()
            .map(|entry| entry.genre)
            .find(|genre| genre.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown genre: {}", s)))
    }
}

impl TryFrom<String> for Genre {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.name().to_string()
    }
}

/// One row of the static genre catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub genre: Genre,
    pub known_count: u32,
}

const fn entry(genre: Genre, known_count: u32) -> CatalogEntry {
    CatalogEntry { genre, known_count }
}

/// The genres offered for selection, in display order
pub static GENRE_CATALOG: [CatalogEntry; 19] = [
    entry(Genre::Action, 715),
    entry(Genre::Adventure, 598),
    entry(Genre::Animation, 200),
    entry(Genre::Comedy, 650),
    entry(Genre::Crime, 322),
    entry(Genre::Documentary, 1),
    entry(Genre::Drama, 762),
    entry(Genre::Family, 303),
    entry(Genre::Fantasy, 349),
    entry(Genre::History, 89),
    entry(Genre::Horror, 255),
    entry(Genre::Music, 45),
    entry(Genre::Mystery, 198),
    entry(Genre::Romance, 297),
    entry(Genre::ScienceFiction, 381),
    entry(Genre::TvMovie, 6),
    entry(Genre::Thriller, 588),
    entry(Genre::War, 70),
    entry(Genre::Western, 24),
];

/// How returned movies must relate to the selected genres
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Any overlap with the selection
    #[default]
    Contains,
    /// Every selected genre must be present
    Exact,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::Exact => "exact",
        }
    }
}

impl Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_nineteen_distinct_genres() {
        let genres: std::collections::HashSet<Genre> =
            GENRE_CATALOG.iter().map(|e| e.genre).collect();
        assert_eq!(genres.len(), 19);
    }

    #[test]
    fn test_only_documentary_and_tv_movie_are_special() {
        let special: Vec<Genre> = GENRE_CATALOG
            .iter()
            .map(|e| e.genre)
            .filter(|g| g.is_special())
            .collect();
        assert_eq!(special, vec![Genre::Documentary, Genre::TvMovie]);
    }

    #[test]
    fn test_known_count() {
        assert_eq!(Genre::Drama.known_count(), 762);
        assert_eq!(Genre::Documentary.known_count(), 1);
        assert_eq!(Genre::TvMovie.known_count(), 6);
    }

    #[test]
    fn test_parse_display_names_case_insensitively() {
        assert_eq!("Science Fiction".parse::<Genre>().unwrap(), Genre::ScienceFiction);
        assert_eq!("tv movie".parse::<Genre>().unwrap(), Genre::TvMovie);
        assert_eq!(" ACTION ".parse::<Genre>().unwrap(), Genre::Action);
    }

    #[test]
    fn test_parse_unknown_genre_fails() {
        let err = "Noir".parse::<Genre>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_genre_serializes_as_display_name() {
        let json = serde_json::to_string(&Genre::TvMovie).unwrap();
        assert_eq!(json, "\"TV Movie\"");

        let genre: Genre = serde_json::from_str("\"science fiction\"").unwrap();
        assert_eq!(genre, Genre::ScienceFiction);

        assert!(serde_json::from_str::<Genre>("\"Noir\"").is_err());
    }

    #[test]
    fn test_match_mode_default_and_serialization() {
        assert_eq!(MatchMode::default(), MatchMode::Contains);
        assert_eq!(serde_json::to_string(&MatchMode::Exact).unwrap(), "\"exact\"");

        let mode: MatchMode = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(mode, MatchMode::Contains);
    }
}
