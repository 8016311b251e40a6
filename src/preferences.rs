//! User preferences: config.toml supplies the defaults, stored values override.
//!
//! Everything the user can change lives under the `ray.` key prefix in the
//! `user_preferences` table. Writes always go to the DB, never to the config
//! file.
use std::collections::HashMap;
use std::fmt;

use chrono::{Days, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, MAX_TEXT_SIZE, MIN_TEXT_SIZE, READINGS_PER_DAY_OPTIONS};
use crate::config::Config;

/// Storage keys.
pub mod keys {
    pub const SELECTED_CATEGORIES: &str = "ray.selected_categories";
    pub const READINGS_PER_DAY: &str = "ray.readings_per_day";
    pub const REMINDER_TIME: &str = "ray.reminder_time";
    pub const TEXT_SIZE: &str = "ray.text_size";
    pub const NOTIFICATIONS_ENABLED: &str = "ray.notifications_enabled";
    pub const COMPLETED_READINGS: &str = "ray.completed_readings";
    pub const CURRENT_DAY: &str = "ray.current_day";
    pub const ONBOARDED: &str = "ray.onboarded";
    pub const LAST_OPENED_DATE: &str = "ray.last_opened_date";
    pub const BOOKMARKS: &str = "ray.bookmarks";

    /// Prefix shared by every key above.
    pub const PREFIX: &str = "ray.";
}

// ============================================================================
// ReminderTime
// ============================================================================

/// Time of day for the daily reminder. Stored as `{"hours":h,"minutes":m}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub hours: u8,
    pub minutes: u8,
}

impl ReminderTime {
    pub const DEFAULT: ReminderTime = ReminderTime {
        hours: 21,
        minutes: 0,
    };

    /// `None` unless `hours < 24` and `minutes < 60`.
    pub fn new(hours: u8, minutes: u8) -> Option<Self> {
        (hours < 24 && minutes < 60).then_some(Self { hours, minutes })
    }

    /// Parse a 24-hour "HH:MM" string.
    ///
    /// ```
    /// use ray::preferences::ReminderTime;
    ///
    /// assert_eq!(ReminderTime::parse_hhmm("07:30"), ReminderTime::new(7, 30));
    /// assert_eq!(ReminderTime::parse_hhmm("24:00"), None);
    /// ```
    pub fn parse_hhmm(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }

    /// Shift by `delta` minutes, wrapping around midnight.
    pub fn shifted(self, delta: i32) -> Self {
        let total = i32::from(self.hours) * 60 + i32::from(self.minutes);
        let wrapped = (total + delta).rem_euclid(24 * 60);
        Self {
            hours: (wrapped / 60) as u8,
            minutes: (wrapped % 60) as u8,
        }
    }

    /// 12-hour label, e.g. "9:00 PM".
    pub fn label_12h(self) -> String {
        let suffix = if self.hours < 12 { "AM" } else { "PM" };
        let hour = match self.hours % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minutes, suffix)
    }

    fn as_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hours), u32::from(self.minutes), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// The first moment strictly after `now` at this time of day.
    pub fn next_after(self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.as_time());
        if today > now {
            today
        } else {
            now.date()
                .checked_add_days(Days::new(1))
                .map(|d| d.and_time(self.as_time()))
                .unwrap_or(today)
        }
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// The user-adjustable settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    /// Always in display order, without duplicates.
    pub selected_categories: Vec<Category>,
    pub readings_per_day: u32,
    pub reminder_time: ReminderTime,
    pub text_size: f32,
    pub notifications_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_categories: Category::DEFAULT_SELECTION.to_vec(),
            readings_per_day: 1,
            reminder_time: ReminderTime::DEFAULT,
            text_size: 1.0,
            notifications_enabled: true,
        }
    }
}

impl Preferences {
    /// Build preferences from the config file, replacing invalid values with
    /// the built-in defaults.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();

        let mut categories = Vec::with_capacity(config.default_categories.len());
        for name in &config.default_categories {
            match Category::from_name(name) {
                Some(c) => categories.push(c),
                None => tracing::warn!(category = %name, "Unknown category in config, ignoring"),
            }
        }

        let readings_per_day = if valid_readings_per_day(config.readings_per_day) {
            config.readings_per_day
        } else {
            tracing::warn!(
                value = config.readings_per_day,
                "readings_per_day must be 1, 2 or 3; using default"
            );
            defaults.readings_per_day
        };

        let reminder_time = ReminderTime::parse_hhmm(&config.reminder_time).unwrap_or_else(|| {
            tracing::warn!(value = %config.reminder_time, "Invalid reminder_time, expected HH:MM");
            defaults.reminder_time
        });

        Self {
            selected_categories: normalize_categories(categories),
            readings_per_day,
            reminder_time,
            text_size: clamp_text_size(config.text_size),
            notifications_enabled: config.notifications_enabled,
        }
    }

    /// Layer stored values on top. Keys that fail to decode keep their
    /// current value and log a warning.
    pub fn apply_stored(&mut self, stored: &HashMap<String, String>) {
        if let Some(v) = decode_json::<Vec<Category>>(stored, keys::SELECTED_CATEGORIES) {
            self.selected_categories = normalize_categories(v);
        }
        if let Some(v) = decode_json::<u32>(stored, keys::READINGS_PER_DAY) {
            if valid_readings_per_day(v) {
                self.readings_per_day = v;
            } else {
                tracing::warn!(value = v, "Stored readings_per_day out of range, ignoring");
            }
        }
        if let Some(v) = decode_json::<ReminderTime>(stored, keys::REMINDER_TIME) {
            match ReminderTime::new(v.hours, v.minutes) {
                Some(t) => self.reminder_time = t,
                None => tracing::warn!(%v, "Stored reminder time out of range, ignoring"),
            }
        }
        if let Some(v) = decode_json::<f32>(stored, keys::TEXT_SIZE) {
            self.text_size = clamp_text_size(v);
        }
        if let Some(v) = decode_json::<bool>(stored, keys::NOTIFICATIONS_ENABLED) {
            self.notifications_enabled = v;
        }
    }

    /// Encoded key-value pairs for every preference.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                keys::SELECTED_CATEGORIES,
                encode_categories(&self.selected_categories),
            ),
            (keys::READINGS_PER_DAY, self.readings_per_day.to_string()),
            (keys::REMINDER_TIME, encode_reminder(self.reminder_time)),
            (keys::TEXT_SIZE, self.text_size.to_string()),
            (
                keys::NOTIFICATIONS_ENABLED,
                self.notifications_enabled.to_string(),
            ),
        ]
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn valid_readings_per_day(n: u32) -> bool {
    READINGS_PER_DAY_OPTIONS.contains(&n)
}

/// Clamp to the supported text size range; non-finite values become 1.0.
pub fn clamp_text_size(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE)
    } else {
        1.0
    }
}

/// Sort into display order and drop duplicates.
pub fn normalize_categories(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort();
    categories.dedup();
    categories
}

pub(crate) fn encode_categories(categories: &[Category]) -> String {
    serde_json::to_string(categories).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn encode_reminder(time: ReminderTime) -> String {
    format!(r#"{{"hours":{},"minutes":{}}}"#, time.hours, time.minutes)
}

pub(crate) fn encode_ids(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a JSON value from the stored map. Missing keys are silent;
/// malformed ones warn.
pub(crate) fn decode_json<T: DeserializeOwned>(
    stored: &HashMap<String, String>,
    key: &str,
) -> Option<T> {
    let raw = stored.get(key)?;
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Unreadable stored value, using default");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
