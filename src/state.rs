//! Reading state provider.
//!
//! Owns the user's preferences and progress, derives today's and previous
//! readings from them, and writes every mutation through to storage before
//! updating memory. A failed write leaves the in-memory state untouched.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tokio::time::Instant;

use crate::catalog::{Catalog, Category, Reading, TOTAL_DAYS};
use crate::clock::Clock;
use crate::config::Config;
use crate::preferences::{
    clamp_text_size, decode_json, encode_categories, encode_ids, encode_reminder, keys,
    normalize_categories, valid_readings_per_day, Preferences, ReminderTime,
};
use crate::schedule::{self, Progress, ScheduledReading};
use crate::storage::{Database, ReadingStats};

/// Sessions shorter than this are treated as accidental opens.
pub const MIN_SESSION: Duration = Duration::from_secs(2);

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum StateError {
    #[error("No reading with id {0:?}")]
    UnknownReading(String),

    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Select at least one category to begin")]
    EmptyCategories,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

// ============================================================================
// ReadingSession
// ============================================================================

/// An open reader session, returned by [`ReadingState::begin_session`].
#[derive(Debug)]
pub struct ReadingSession {
    id: i64,
    reading_id: String,
    started: Instant,
}

impl ReadingSession {
    pub fn reading_id(&self) -> &str {
        &self.reading_id
    }
}

// ============================================================================
// ReadingState
// ============================================================================

pub struct ReadingState {
    db: Database,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    /// Config-derived preferences, restored by `reset`.
    defaults: Preferences,
    prefs: Preferences,
    onboarded: bool,
    current_day: u32,
    last_opened: Option<NaiveDate>,
    completed: Vec<String>,
    /// Most recently added first.
    bookmarks: Vec<String>,
    /// Catalog readings in the selected categories, catalog order.
    filtered: Vec<Arc<Reading>>,
}

impl ReadingState {
    /// Load persisted state and apply the day transition.
    ///
    /// Before onboarding nothing is read beyond `ray.onboarded` and nothing
    /// is written; the config file supplies every value.
    pub async fn load(
        db: Database,
        catalog: Arc<Catalog>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StateError> {
        let defaults = Preferences::from_config(config);
        let stored: HashMap<String, String> = db
            .get_preferences_by_prefix(keys::PREFIX)
            .await?
            .into_iter()
            .collect();

        let onboarded = decode_json::<bool>(&stored, keys::ONBOARDED).unwrap_or(false);
        let mut state = Self {
            db,
            filtered: catalog.filtered(&defaults.selected_categories),
            catalog,
            clock,
            prefs: defaults.clone(),
            defaults,
            onboarded,
            current_day: 1,
            last_opened: None,
            completed: Vec::new(),
            bookmarks: Vec::new(),
        };

        if !onboarded {
            tracing::debug!("Not onboarded yet, using configured defaults");
            return Ok(state);
        }

        state.prefs.apply_stored(&stored);
        state.filtered = state.catalog.filtered(&state.prefs.selected_categories);
        state.completed =
            decode_json::<Vec<String>>(&stored, keys::COMPLETED_READINGS).unwrap_or_default();
        state.bookmarks = decode_json::<Vec<String>>(&stored, keys::BOOKMARKS).unwrap_or_default();
        state.current_day = decode_json::<u32>(&stored, keys::CURRENT_DAY)
            .unwrap_or(1)
            .clamp(1, TOTAL_DAYS);
        state.last_opened = stored.get(keys::LAST_OPENED_DATE).and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| tracing::warn!(value = %raw, error = %e, "Unreadable last-opened date"))
                .ok()
        });

        state.check_day_rollover().await?;
        tracing::info!(
            day = state.current_day,
            readings = state.filtered.len(),
            completed = state.completed.len(),
            "Reading state loaded"
        );
        Ok(state)
    }

    /// Advance the day counter if the calendar date changed since the last
    /// check. Returns `true` when the counter moved.
    ///
    /// Called at load and periodically while the app stays open across
    /// midnight. A no-op before onboarding.
    pub async fn check_day_rollover(&mut self) -> Result<bool, StateError> {
        if !self.onboarded {
            return Ok(false);
        }
        let today = self.clock.today();
        let transition = schedule::advance_day(self.last_opened, today, self.current_day);
        if !transition.changed {
            return Ok(false);
        }

        self.db
            .set_preferences(&[
                (keys::CURRENT_DAY, transition.current_day.to_string()),
                (keys::LAST_OPENED_DATE, format_date(transition.last_opened)),
            ])
            .await?;
        self.current_day = transition.current_day;
        self.last_opened = Some(transition.last_opened);

        if transition.advanced {
            tracing::info!(day = self.current_day, %today, "Advanced to a new day");
        }
        Ok(transition.advanced)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarded
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn completed_ids(&self) -> &[String] {
        &self.completed
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn find_reading(&self, id: &str) -> Option<Arc<Reading>> {
        self.catalog.find(id).cloned()
    }

    // ========================================================================
    // Derived Views
    // ========================================================================

    pub fn todays_readings(&self) -> Vec<ScheduledReading> {
        schedule::todays_readings(
            &self.filtered,
            self.current_day,
            self.prefs.readings_per_day,
            &self.completed,
        )
    }

    pub fn previous_readings(&self) -> Vec<ScheduledReading> {
        schedule::previous_readings(
            &self.filtered,
            self.current_day,
            self.prefs.readings_per_day,
            &self.completed,
        )
    }

    pub fn progress(&self) -> Progress {
        schedule::progress(&self.filtered, &self.completed)
    }

    /// Calendar date `day` was scheduled for.
    pub fn scheduled_date(&self, day: u32) -> NaiveDate {
        schedule::scheduled_date(self.clock.today(), self.current_day, day)
    }

    /// When the next reminder is due, or `None` with notifications off.
    pub fn next_reminder(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.prefs
            .notifications_enabled
            .then(|| self.prefs.reminder_time.next_after(now))
    }

    // ========================================================================
    // Preference Setters
    // ========================================================================

    pub async fn set_selected_categories(
        &mut self,
        categories: Vec<Category>,
    ) -> Result<(), StateError> {
        let categories = normalize_categories(categories);
        self.db
            .set_preference(keys::SELECTED_CATEGORIES, &encode_categories(&categories))
            .await?;
        self.filtered = self.catalog.filtered(&categories);
        self.prefs.selected_categories = categories;
        Ok(())
    }

    /// Add or remove one category. Returns whether it is now selected.
    pub async fn toggle_category(&mut self, category: Category) -> Result<bool, StateError> {
        let mut next = self.prefs.selected_categories.clone();
        let selected = if let Some(pos) = next.iter().position(|c| *c == category) {
            next.remove(pos);
            false
        } else {
            next.push(category);
            true
        };
        self.set_selected_categories(next).await?;
        Ok(selected)
    }

    pub async fn set_readings_per_day(&mut self, n: u32) -> Result<(), StateError> {
        if !valid_readings_per_day(n) {
            return Err(StateError::InvalidValue {
                field: "readings per day",
                reason: format!("{} is not one of 1, 2, 3", n),
            });
        }
        self.db
            .set_preference(keys::READINGS_PER_DAY, &n.to_string())
            .await?;
        self.prefs.readings_per_day = n;
        Ok(())
    }

    pub async fn set_reminder_time(&mut self, hours: u8, minutes: u8) -> Result<(), StateError> {
        let time = ReminderTime::new(hours, minutes).ok_or_else(|| StateError::InvalidValue {
            field: "reminder time",
            reason: format!("{}:{:02} is not a time of day", hours, minutes),
        })?;
        self.db
            .set_preference(keys::REMINDER_TIME, &encode_reminder(time))
            .await?;
        self.prefs.reminder_time = time;
        Ok(())
    }

    /// Store a text size, clamped to the supported range. Returns the value
    /// actually stored.
    pub async fn set_text_size(&mut self, size: f32) -> Result<f32, StateError> {
        let size = clamp_text_size(size);
        self.db
            .set_preference(keys::TEXT_SIZE, &size.to_string())
            .await?;
        self.prefs.text_size = size;
        Ok(size)
    }

    pub async fn set_notifications_enabled(&mut self, enabled: bool) -> Result<(), StateError> {
        self.db
            .set_preference(keys::NOTIFICATIONS_ENABLED, &enabled.to_string())
            .await?;
        self.prefs.notifications_enabled = enabled;
        Ok(())
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Finish onboarding: persist every preference, start day 1 today.
    ///
    /// A second call is a no-op.
    pub async fn initialize(&mut self) -> Result<(), StateError> {
        if self.onboarded {
            return Ok(());
        }
        if self.prefs.selected_categories.is_empty() {
            return Err(StateError::EmptyCategories);
        }

        let today = self.clock.today();
        let mut pairs = self.prefs.to_pairs();
        pairs.extend([
            (keys::CURRENT_DAY, self.current_day.to_string()),
            (keys::COMPLETED_READINGS, encode_ids(&self.completed)),
            (keys::BOOKMARKS, encode_ids(&self.bookmarks)),
            (keys::LAST_OPENED_DATE, format_date(today)),
            (keys::ONBOARDED, "true".to_string()),
        ]);
        self.db.set_preferences(&pairs).await?;

        self.onboarded = true;
        self.last_opened = Some(today);
        tracing::info!(
            categories = self.prefs.selected_categories.len(),
            per_day = self.prefs.readings_per_day,
            "Onboarding complete"
        );
        Ok(())
    }

    /// Record a reading as completed. Returns `false` if it already was.
    pub async fn mark_completed(&mut self, id: &str) -> Result<bool, StateError> {
        if !self.catalog.contains(id) {
            return Err(StateError::UnknownReading(id.to_string()));
        }
        if self.is_completed(id) {
            return Ok(false);
        }

        let mut next = self.completed.clone();
        next.push(id.to_string());
        self.db
            .set_preference(keys::COMPLETED_READINGS, &encode_ids(&next))
            .await?;
        self.completed = next;
        tracing::debug!(id, "Marked reading completed");
        Ok(true)
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|b| b == id)
    }

    /// Add or remove a bookmark. Returns whether the reading is now
    /// bookmarked.
    pub async fn toggle_bookmark(&mut self, id: &str) -> Result<bool, StateError> {
        if !self.catalog.contains(id) {
            return Err(StateError::UnknownReading(id.to_string()));
        }

        let mut next = self.bookmarks.clone();
        let now_bookmarked = if let Some(pos) = next.iter().position(|b| b == id) {
            next.remove(pos);
            false
        } else {
            next.insert(0, id.to_string());
            true
        };
        self.db
            .set_preference(keys::BOOKMARKS, &encode_ids(&next))
            .await?;
        self.bookmarks = next;
        Ok(now_bookmarked)
    }

    /// Bookmarked readings, most recently added first. Ids no longer in the
    /// catalog are skipped.
    pub fn bookmarks(&self) -> Vec<Arc<Reading>> {
        self.bookmarks
            .iter()
            .filter_map(|id| self.catalog.find(id).cloned())
            .collect()
    }

    // ========================================================================
    // Reading Sessions
    // ========================================================================

    pub async fn begin_session(&self, id: &str) -> Result<ReadingSession, StateError> {
        if !self.catalog.contains(id) {
            return Err(StateError::UnknownReading(id.to_string()));
        }
        let session_id = self.db.record_session_open(id).await?;
        Ok(ReadingSession {
            id: session_id,
            reading_id: id.to_string(),
            started: Instant::now(),
        })
    }

    /// Close a session. Returns the recorded duration, or `None` when it was
    /// too short to count.
    pub async fn end_session(
        &self,
        session: ReadingSession,
    ) -> Result<Option<Duration>, StateError> {
        let elapsed = session.started.elapsed();
        self.finish_session(session, elapsed).await
    }

    async fn finish_session(
        &self,
        session: ReadingSession,
        elapsed: Duration,
    ) -> Result<Option<Duration>, StateError> {
        if elapsed < MIN_SESSION {
            self.db.discard_session(session.id).await?;
            return Ok(None);
        }
        let secs = i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX);
        self.db.record_session_close(session.id, secs).await?;
        tracing::debug!(reading = %session.reading_id, secs, "Reading session recorded");
        Ok(Some(elapsed))
    }

    pub async fn reading_stats(&self, days: u32) -> Result<ReadingStats, StateError> {
        Ok(self.db.get_reading_stats(days).await?)
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Erase everything stored and return to the pre-onboarding state.
    pub async fn reset(&mut self) -> Result<(), StateError> {
        self.db.clear_all().await?;
        self.prefs = self.defaults.clone();
        self.filtered = self.catalog.filtered(&self.prefs.selected_categories);
        self.onboarded = false;
        self.current_day = 1;
        self.last_opened = None;
        self.completed.clear();
        self.bookmarks.clear();
        tracing::info!("All stored state cleared");
        Ok(())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// Tests
// ============================================================================
