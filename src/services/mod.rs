pub mod providers;
pub mod query_executor;
pub mod selection;

pub use providers::{MovieApiProvider, RecommendationSource};
pub use query_executor::{Lifecycle, PendingQuery, QueryExecutor};
pub use selection::{can_add, SelectionController, ToggleOutcome, MAX_SELECTION};
