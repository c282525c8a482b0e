use serde::{Deserialize, Deserializer, Serialize};

/// TMDB image template that poster paths are appended to
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w600_and_h900_bestv2";

/// One movie returned by the recommendation service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Free-text, already joined by the service (e.g. "Action, Drama")
    pub genres: String,
    /// ISO "YYYY-MM-DD"
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_path: String,
}

impl Movie {
    /// Release year: everything before the first `-` of the release date
    pub fn release_year(&self) -> &str {
        self.release_date
            .split('-')
            .next()
            .unwrap_or(&self.release_date)
    }

    /// Full poster image URL, or None when the service sent no poster path
    pub fn poster_url(&self) -> Option<String> {
        if self.poster_path.is_empty() {
            None
        } else {
            Some(format!("{}{}", POSTER_BASE_URL, self.poster_path))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
