mod preferences;
mod schema;
mod sessions;
mod types;

pub use schema::Database;
pub use types::{DatabaseError, ReadingSessionEntry, ReadingStats};
