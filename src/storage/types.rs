use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of ray appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a sqlx error, recognising SQLite lock conditions.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all surface
/// as one of these messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

// ============================================================================
// Reading Sessions
// ============================================================================

/// One recorded reader session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSessionEntry {
    pub id: i64,
    pub reading_id: String,
    /// SQLite `datetime('now')` text (UTC).
    pub opened_at: String,
    /// `None` when the session was never closed (crash, kill).
    pub duration_seconds: Option<i64>,
}

/// Aggregated reader activity over a time window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingStats {
    /// Closed sessions in the window.
    pub sessions: u32,
    /// Distinct readings opened in the window.
    pub distinct_readings: u32,
    pub total_minutes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_messages_detected() {
        assert!(is_lock_message("error returned from database: database is locked"));
        assert!(is_lock_message("(code: 14) unable to open database file"));
        assert!(!is_lock_message("no such table: user_preferences"));
    }
}
