//! Reading-progression scheduler.
//!
//! Pure functions over the category-filtered reading list. Day `d` with `n`
//! readings per day owns indices `(d-1)*n .. d*n` of that list; anything past
//! the end of the list simply doesn't exist.
use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::catalog::{Reading, TOTAL_DAYS};

/// How many days back the "previous readings" view reaches.
pub const PREVIOUS_DAYS_WINDOW: u32 = 7;

/// A reading placed on a specific day, with its completion state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReading {
    pub reading: Arc<Reading>,
    pub completed: bool,
    /// 1-based day this reading is scheduled for.
    pub day: u32,
}

/// Outcome of comparing the last-opened date against today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTransition {
    pub current_day: u32,
    pub last_opened: NaiveDate,
    /// The day counter moved forward.
    pub advanced: bool,
    /// Something needs persisting (day counter or last-opened date).
    pub changed: bool,
}

/// Completed vs total readings across the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction complete in `0.0..=1.0`; an empty list counts as zero.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

fn schedule_day(
    filtered: &[Arc<Reading>],
    day: u32,
    per_day: u32,
    completed: &[String],
    out: &mut Vec<ScheduledReading>,
) {
    if day == 0 {
        return;
    }
    let per_day = per_day.max(1) as usize;
    let start = (day as usize - 1) * per_day;
    for index in start..start + per_day {
        let Some(reading) = filtered.get(index) else {
            break;
        };
        out.push(ScheduledReading {
            completed: completed.iter().any(|id| *id == reading.id),
            reading: Arc::clone(reading),
            day: (index / per_day) as u32 + 1,
        });
    }
}

/// Readings scheduled for `current_day`.
///
/// At most `per_day` entries; fewer (possibly none) once the filtered list
/// runs out.
pub fn todays_readings(
    filtered: &[Arc<Reading>],
    current_day: u32,
    per_day: u32,
    completed: &[String],
) -> Vec<ScheduledReading> {
    let mut out = Vec::with_capacity(per_day.max(1) as usize);
    schedule_day(filtered, current_day, per_day, completed, &mut out);
    out
}

/// Readings from the last [`PREVIOUS_DAYS_WINDOW`] days before `current_day`,
/// most recent day first.
pub fn previous_readings(
    filtered: &[Arc<Reading>],
    current_day: u32,
    per_day: u32,
    completed: &[String],
) -> Vec<ScheduledReading> {
    let oldest = current_day.saturating_sub(PREVIOUS_DAYS_WINDOW).max(1);
    let mut out = Vec::new();
    for day in (oldest..current_day).rev() {
        schedule_day(filtered, day, per_day, completed, &mut out);
    }
    out
}

/// Apply the calendar rule for the day counter.
///
/// The counter moves by one for each new calendar day on which the app is
/// opened, never by the number of elapsed days, and stops at [`TOTAL_DAYS`].
/// A last-opened date in the future (clock moved backwards) is reset to
/// today without touching the counter.
pub fn advance_day(
    last_opened: Option<NaiveDate>,
    today: NaiveDate,
    current_day: u32,
) -> DayTransition {
    let current_day = current_day.clamp(1, TOTAL_DAYS);
    match last_opened {
        None => DayTransition {
            current_day,
            last_opened: today,
            advanced: false,
            changed: true,
        },
        Some(last) if last < today => {
            let next = (current_day + 1).min(TOTAL_DAYS);
            DayTransition {
                current_day: next,
                last_opened: today,
                advanced: next != current_day,
                changed: true,
            }
        }
        Some(last) if last == today => DayTransition {
            current_day,
            last_opened: today,
            advanced: false,
            changed: false,
        },
        Some(last) => {
            tracing::warn!(%last, %today, "Last-opened date is in the future, resetting");
            DayTransition {
                current_day,
                last_opened: today,
                advanced: false,
                changed: true,
            }
        }
    }
}

/// How many of the filtered readings are completed.
pub fn progress(filtered: &[Arc<Reading>], completed: &[String]) -> Progress {
    Progress {
        completed: filtered
            .iter()
            .filter(|r| completed.iter().any(|id| *id == r.id))
            .count(),
        total: filtered.len(),
    }
}

/// Calendar date on which `day` was (or will be) today, given that
/// `current_day` is today.
pub fn scheduled_date(today: NaiveDate, current_day: u32, day: u32) -> NaiveDate {
    if day <= current_day {
        today
            .checked_sub_days(Days::new(u64::from(current_day - day)))
            .unwrap_or(today)
    } else {
        today
            .checked_add_days(Days::new(u64::from(day - current_day)))
            .unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn list(n: usize) -> Vec<Arc<Reading>> {
        (1..=n)
            .map(|i| {
                Arc::new(Reading {
                    id: i.to_string(),
                    title: format!("Reading {}", i),
                    author: "Author".to_string(),
                    category: Category::Essays,
                    content: "text".to_string(),
                    image_url: None,
                    reading_time: Some(3),
                })
            })
            .collect()
    }

    fn ids(readings: &[ScheduledReading]) -> Vec<&str> {
        readings.iter().map(|s| s.reading.id.as_str()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_first_day() {
        let filtered = list(5);
        let today = todays_readings(&filtered, 1, 1, &[]);
        assert_eq!(ids(&today), vec!["1"]);
        assert_eq!(today[0].day, 1);
        assert!(!today[0].completed);
    }

    #[test]
    fn test_today_multiple_per_day() {
        let filtered = list(10);
        let today = todays_readings(&filtered, 3, 3, &[]);
        assert_eq!(ids(&today), vec!["7", "8", "9"]);
        assert!(today.iter().all(|s| s.day == 3));
    }

    #[test]
    fn test_today_partial_at_end() {
        let filtered = list(5);
        let today = todays_readings(&filtered, 3, 2, &[]);
        assert_eq!(ids(&today), vec!["5"]);
    }

    #[test]
    fn test_today_past_end_is_empty() {
        let filtered = list(5);
        assert!(todays_readings(&filtered, 6, 1, &[]).is_empty());
        assert!(todays_readings(&[], 1, 1, &[]).is_empty());
    }

    #[test]
    fn test_today_marks_completed() {
        let filtered = list(4);
        let done = vec!["4".to_string()];
        let today = todays_readings(&filtered, 2, 2, &done);
        assert_eq!(
            today.iter().map(|s| s.completed).collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[test]
    fn test_zero_per_day_treated_as_one() {
        let filtered = list(3);
        assert_eq!(ids(&todays_readings(&filtered, 2, 0, &[])), vec!["2"]);
    }

    #[test]
    fn test_previous_none_on_day_one() {
        let filtered = list(5);
        assert!(previous_readings(&filtered, 1, 1, &[]).is_empty());
    }

    #[test]
    fn test_previous_most_recent_first() {
        let filtered = list(10);
        let prev = previous_readings(&filtered, 4, 2, &[]);
        assert_eq!(ids(&prev), vec!["5", "6", "3", "4", "1", "2"]);
        assert_eq!(
            prev.iter().map(|s| s.day).collect::<Vec<_>>(),
            vec![3, 3, 2, 2, 1, 1]
        );
    }

    #[test]
    fn test_previous_window_is_seven_days() {
        let filtered = list(20);
        let prev = previous_readings(&filtered, 12, 1, &[]);
        assert_eq!(
            prev.iter().map(|s| s.day).collect::<Vec<_>>(),
            vec![11, 10, 9, 8, 7, 6, 5]
        );
    }

    #[test]
    fn test_previous_skips_missing_indices() {
        // Day counter ran past the end of a short list
        let filtered = list(3);
        let prev = previous_readings(&filtered, 6, 1, &[]);
        assert_eq!(ids(&prev), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_advance_first_open() {
        let t = advance_day(None, date(2026, 10, 18), 1);
        assert_eq!(t.current_day, 1);
        assert_eq!(t.last_opened, date(2026, 10, 18));
        assert!(!t.advanced);
        assert!(t.changed);
    }

    #[test]
    fn test_advance_same_day() {
        let today = date(2026, 10, 18);
        let t = advance_day(Some(today), today, 4);
        assert_eq!(t.current_day, 4);
        assert!(!t.advanced);
        assert!(!t.changed);
    }

    #[test]
    fn test_advance_next_day() {
        let t = advance_day(Some(date(2026, 10, 17)), date(2026, 10, 18), 4);
        assert_eq!(t.current_day, 5);
        assert_eq!(t.last_opened, date(2026, 10, 18));
        assert!(t.advanced);
        assert!(t.changed);
    }

    #[test]
    fn test_advance_after_long_gap_moves_one_day() {
        let t = advance_day(Some(date(2026, 9, 1)), date(2026, 10, 18), 4);
        assert_eq!(t.current_day, 5);
    }

    #[test]
    fn test_advance_future_last_opened() {
        let t = advance_day(Some(date(2026, 10, 20)), date(2026, 10, 18), 4);
        assert_eq!(t.current_day, 4);
        assert_eq!(t.last_opened, date(2026, 10, 18));
        assert!(!t.advanced);
        assert!(t.changed);
    }

    #[test]
    fn test_advance_capped_at_total_days() {
        let t = advance_day(Some(date(2026, 10, 17)), date(2026, 10, 18), TOTAL_DAYS);
        assert_eq!(t.current_day, TOTAL_DAYS);
        assert!(!t.advanced);
        assert!(t.changed);
    }

    #[test]
    fn test_advance_clamps_zero_day() {
        let today = date(2026, 10, 18);
        assert_eq!(advance_day(Some(today), today, 0).current_day, 1);
    }

    #[test]
    fn test_progress() {
        let filtered = list(4);
        let done = vec!["2".to_string(), "3".to_string(), "99".to_string()];
        let p = progress(&filtered, &done);
        assert_eq!(p, Progress { completed: 2, total: 4 });
        assert!((p.fraction() - 0.5).abs() < f64::EPSILON);
        assert_eq!(Progress::default().fraction(), 0.0);
    }

    #[test]
    fn test_scheduled_date() {
        let today = date(2026, 10, 18);
        assert_eq!(scheduled_date(today, 5, 5), today);
        assert_eq!(scheduled_date(today, 5, 3), date(2026, 10, 16));
        assert_eq!(scheduled_date(today, 5, 6), date(2026, 10, 19));
    }

    proptest! {
        #[test]
        fn prop_today_bounded_and_disjoint_from_previous(
            len in 0usize..40,
            day in 1u32..30,
            per_day in 1u32..=3,
        ) {
            let filtered = list(len);
            let today = todays_readings(&filtered, day, per_day, &[]);
            let prev = previous_readings(&filtered, day, per_day, &[]);

            prop_assert!(today.len() <= per_day as usize);
            prop_assert!(today.iter().all(|s| s.day == day));
            for p in &prev {
                prop_assert!(p.day < day);
                prop_assert!(p.day + PREVIOUS_DAYS_WINDOW >= day);
                prop_assert!(!today.iter().any(|t| t.reading.id == p.reading.id));
            }
            prop_assert!(prev.windows(2).all(|w| w[0].day >= w[1].day));
        }

        #[test]
        fn prop_advance_never_decreases(
            offset in -5i64..5,
            day in 1u32..=TOTAL_DAYS,
        ) {
            let today = date(2026, 10, 18);
            let last = today + chrono::Duration::days(offset);
            let t = advance_day(Some(last), today, day);
            prop_assert!(t.current_day >= day);
            prop_assert!(t.current_day <= day + 1);
            prop_assert!(t.current_day <= TOTAL_DAYS);
            prop_assert_eq!(t.last_opened, today);
        }
    }
}
