//! Integration tests for the daily reading journey: onboarding, the day
//! counter, completion, and previous days.
//!
//! Each test creates its own in-memory SQLite database and a fixed clock
//! so calendar days can be stepped deterministically.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use ray::catalog::{Catalog, Category};
use ray::clock::FixedClock;
use ray::config::Config;
use ray::schedule::ScheduledReading;
use ray::state::{ReadingState, StateError};
use ray::storage::Database;
use std::sync::Arc;

const CATALOG: &str = r#"
[[readings]]
id = "p1"
title = "On Attention"
author = "A. Writer"
category = "Philosophy"
content = "Attention is the rarest form of generosity."

[[readings]]
id = "s1"
title = "Tides"
author = "B. Writer"
category = "Science"
content = "The moon pulls the sea."

[[readings]]
id = "p2"
title = "On Time"
author = "A. Writer"
category = "Philosophy"
content = "Time is the substance I am made of."

[[readings]]
id = "l1"
title = "The Garden"
author = "C. Writer"
category = "Literature"
content = "The garden knows things we don't."

[[readings]]
id = "p3"
title = "On Doubt"
author = "A. Writer"
category = "Philosophy"
content = "Doubt is the beginning of wisdom."
"#;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_toml(CATALOG).unwrap())
}

fn ids(readings: &[ScheduledReading]) -> Vec<&str> {
    readings.iter().map(|r| r.reading.id.as_str()).collect()
}

async fn load(db: &Database, clock: &Arc<FixedClock>) -> ReadingState {
    ReadingState::load(db.clone(), catalog(), &Config::default(), clock.clone())
        .await
        .unwrap()
}

/// Onboard with Philosophy only, one reading per day, on October 1st.
async fn onboard() -> (Database, Arc<FixedClock>, ReadingState) {
    let db = Database::open(":memory:").await.unwrap();
    let clock = Arc::new(FixedClock::at_date(date(1)));
    let mut state = load(&db, &clock).await;
    state
        .set_selected_categories(vec![Category::Philosophy])
        .await
        .unwrap();
    state.initialize().await.unwrap();
    (db, clock, state)
}

// ============================================================================
// Day Counter
// ============================================================================

#[tokio::test]
async fn test_first_day_shows_first_reading() {
    let (_db, _clock, state) = onboard().await;
    assert_eq!(state.current_day(), 1);
    assert_eq!(ids(&state.todays_readings()), vec!["p1"]);
    assert!(state.previous_readings().is_empty());
}

#[tokio::test]
async fn test_reopening_same_day_keeps_counter() {
    let (db, clock, _state) = onboard().await;
    let state = load(&db, &clock).await;
    assert_eq!(state.current_day(), 1);
}

#[tokio::test]
async fn test_counter_moves_once_per_opened_day() {
    let (db, clock, _state) = onboard().await;

    clock.set_date(date(2));
    let state = load(&db, &clock).await;
    assert_eq!(state.current_day(), 2);
    assert_eq!(ids(&state.todays_readings()), vec!["p2"]);
    assert_eq!(ids(&state.previous_readings()), vec!["p1"]);

    // A week away still only advances by one
    clock.set_date(date(9));
    let state = load(&db, &clock).await;
    assert_eq!(state.current_day(), 3);
    assert_eq!(ids(&state.todays_readings()), vec!["p3"]);
}

#[tokio::test]
async fn test_clock_moved_back_keeps_counter() {
    let (db, clock, _state) = onboard().await;
    clock.set_date(date(5));
    assert_eq!(load(&db, &clock).await.current_day(), 2);

    clock.set_date(date(3));
    let state = load(&db, &clock).await;
    assert_eq!(state.current_day(), 2);

    // The next real day after the reset advances normally
    clock.set_date(date(4));
    assert_eq!(load(&db, &clock).await.current_day(), 3);
}

#[tokio::test]
async fn test_rollover_while_open() {
    let (_db, clock, mut state) = onboard().await;
    assert!(!state.check_day_rollover().await.unwrap());

    clock.set_date(date(2));
    assert!(state.check_day_rollover().await.unwrap());
    assert_eq!(state.current_day(), 2);
}

#[tokio::test]
async fn test_catalog_exhausted() {
    let (db, clock, _state) = onboard().await;
    for d in 2..=5 {
        clock.set_date(date(d));
        load(&db, &clock).await;
    }
    let state = load(&db, &clock).await;
    assert_eq!(state.current_day(), 5);
    assert!(state.todays_readings().is_empty());
    assert_eq!(ids(&state.previous_readings()), vec!["p3", "p2", "p1"]);
}

// ============================================================================
// Completion
// ============================================================================

#[tokio::test]
async fn test_completion_survives_reload() {
    let (db, clock, mut state) = onboard().await;
    assert!(state.mark_completed("p1").await.unwrap());
    assert!(!state.mark_completed("p1").await.unwrap());

    clock.set_date(date(2));
    let state = load(&db, &clock).await;
    let previous = state.previous_readings();
    assert!(previous[0].completed);
    assert_eq!(state.progress().completed, 1);
    assert_eq!(state.progress().total, 3);
}

#[tokio::test]
async fn test_unknown_reading_rejected() {
    let (_db, _clock, mut state) = onboard().await;
    let err = state.mark_completed("nope").await.unwrap_err();
    assert!(matches!(err, StateError::UnknownReading(id) if id == "nope"));
}

#[tokio::test]
async fn test_completion_outside_categories_not_counted() {
    let (_db, _clock, mut state) = onboard().await;
    state.mark_completed("s1").await.unwrap();
    assert_eq!(state.progress().completed, 0);

    state.toggle_category(Category::Science).await.unwrap();
    assert_eq!(state.progress().completed, 1);
    assert_eq!(state.progress().total, 4);
}

// ============================================================================
// Changing Preferences Mid-Journey
// ============================================================================

#[tokio::test]
async fn test_more_readings_per_day_reslices_schedule() {
    let (db, clock, mut state) = onboard().await;
    clock.set_date(date(2));
    state.check_day_rollover().await.unwrap();

    state.set_readings_per_day(2).await.unwrap();
    // Day 2 with two per day covers the third and fourth filtered readings
    assert_eq!(ids(&state.todays_readings()), vec!["p3"]);
    assert_eq!(ids(&state.previous_readings()), vec!["p1", "p2"]);

    let state = load(&db, &clock).await;
    assert_eq!(state.preferences().readings_per_day, 2);
}

#[tokio::test]
async fn test_reset_returns_to_onboarding() {
    let (db, clock, mut state) = onboard().await;
    state.mark_completed("p1").await.unwrap();
    state.toggle_bookmark("p2").await.unwrap();

    state.reset().await.unwrap();
    assert!(!state.is_onboarded());

    let state = load(&db, &clock).await;
    assert!(!state.is_onboarded());
    assert_eq!(state.current_day(), 1);
    assert!(state.completed_ids().is_empty());
    assert!(state.bookmarks().is_empty());
}
