pub mod genre;
pub mod movie;
pub mod query;

pub use genre::{CatalogEntry, Genre, MatchMode, GENRE_CATALOG};
pub use movie::{Movie, POSTER_BASE_URL};
pub use query::{MovieRequest, QueryDescriptor, GENRE_SEPARATOR};
