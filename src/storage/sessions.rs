use anyhow::Result;

use super::schema::Database;
use super::types::{ReadingSessionEntry, ReadingStats};

impl Database {
    // ========================================================================
    // Reading Session Operations
    // ========================================================================

    /// Record that the user opened a reading in the reader.
    ///
    /// Returns the new row's ID for later use with `record_session_close`.
    pub async fn record_session_open(&self, reading_id: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO reading_sessions (reading_id, opened_at)
            VALUES (?, datetime('now'))
            RETURNING id
        "#,
        )
        .bind(reading_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Complete a session with its elapsed duration.
    ///
    /// `duration_seconds` stays NULL if this is never called (crash, kill).
    pub async fn record_session_close(&self, session_id: i64, duration_seconds: i64) -> Result<()> {
        // Negative durations would wrap when summed as u64
        let duration_seconds = duration_seconds.max(0);
        sqlx::query(
            r#"
            UPDATE reading_sessions
            SET closed_at = datetime('now'), duration_seconds = ?
            WHERE id = ?
        "#,
        )
        .bind(duration_seconds)
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop a session row entirely (used for accidental opens).
    pub async fn discard_session(&self, session_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM reading_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Aggregate closed sessions opened within the last `days` days.
    pub async fn get_reading_stats(&self, days: u32) -> Result<ReadingStats> {
        let (sessions, distinct, total_secs): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT reading_id), COALESCE(SUM(duration_seconds), 0)
            FROM reading_sessions
            WHERE duration_seconds IS NOT NULL
              AND opened_at > datetime('now', '-' || ? || ' days')
        "#,
        )
        .bind(days)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReadingStats {
            sessions: sessions.max(0) as u32,
            distinct_readings: distinct.max(0) as u32,
            total_minutes: total_secs.max(0) as u64 / 60,
        })
    }

    /// Most recent sessions first, closed or not.
    pub async fn recent_sessions(&self, limit: u32) -> Result<Vec<ReadingSessionEntry>> {
        let rows: Vec<(i64, String, String, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT id, reading_id, opened_at, duration_seconds
            FROM reading_sessions
            ORDER BY opened_at DESC, id DESC
            LIMIT ?
        "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, reading_id, opened_at, duration_seconds)| ReadingSessionEntry {
                    id,
                    reading_id,
                    opened_at,
                    duration_seconds,
                },
            )
            .collect())
    }
}
