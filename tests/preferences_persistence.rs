//! Integration tests for preference layering, bookmarks, and reading
//! sessions across reloads.
//!
//! Config values act as defaults; once onboarded, stored values win.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use ray::catalog::{Catalog, Category};
use ray::clock::FixedClock;
use ray::config::Config;
use ray::preferences::{keys, ReminderTime};
use ray::state::{ReadingState, StateError};
use ray::storage::Database;
use std::sync::Arc;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()))
}

async fn load(db: &Database, config: &Config) -> ReadingState {
    ReadingState::load(
        db.clone(),
        Arc::new(Catalog::bundled().unwrap()),
        config,
        clock(),
    )
    .await
    .unwrap()
}

fn custom_config() -> Config {
    Config::parse(
        r#"
theme = "light"
default_categories = ["Science", "History"]
readings_per_day = 2
reminder_time = "07:30"
text_size = 1.2
notifications_enabled = false
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_config_supplies_onboarding_defaults() {
    let db = Database::open(":memory:").await.unwrap();
    let state = load(&db, &custom_config()).await;

    let prefs = state.preferences();
    assert_eq!(
        prefs.selected_categories,
        vec![Category::Science, Category::History]
    );
    assert_eq!(prefs.readings_per_day, 2);
    assert_eq!(prefs.reminder_time, ReminderTime::new(7, 30).unwrap());
    assert_eq!(prefs.text_size, 1.2);
    assert!(!prefs.notifications_enabled);
    assert_eq!(state.next_reminder(state.now()), None);
}

#[tokio::test]
async fn test_stored_values_override_config_after_onboarding() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;
    state.set_readings_per_day(3).await.unwrap();
    state.set_text_size(1.5).await.unwrap();
    state.initialize().await.unwrap();

    let state = load(&db, &custom_config()).await;
    let prefs = state.preferences();
    assert_eq!(prefs.readings_per_day, 3);
    assert_eq!(prefs.text_size, 1.5);
    // Never changed by the user, so onboarding saved the default selection
    assert_eq!(prefs.selected_categories, Category::DEFAULT_SELECTION.to_vec());
}

#[tokio::test]
async fn test_stored_values_ignored_before_onboarding() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;
    state.set_readings_per_day(3).await.unwrap();

    let state = load(&db, &Config::default()).await;
    assert!(!state.is_onboarded());
    assert_eq!(state.preferences().readings_per_day, 1);
}

#[tokio::test]
async fn test_empty_categories_block_onboarding_only() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;
    state.set_selected_categories(Vec::new()).await.unwrap();
    assert!(matches!(
        state.initialize().await,
        Err(StateError::EmptyCategories)
    ));

    state
        .set_selected_categories(vec![Category::Poetry])
        .await
        .unwrap();
    state.initialize().await.unwrap();

    // After onboarding an empty selection is allowed and simply shows nothing
    state.set_selected_categories(Vec::new()).await.unwrap();
    assert!(state.todays_readings().is_empty());
    assert_eq!(state.progress().total, 0);
}

#[tokio::test]
async fn test_invalid_values_rejected_without_writing() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;

    assert!(state.set_readings_per_day(4).await.is_err());
    assert!(state.set_reminder_time(24, 0).await.is_err());
    assert_eq!(db.get_preference(keys::READINGS_PER_DAY).await.unwrap(), None);
    assert_eq!(db.get_preference(keys::REMINDER_TIME).await.unwrap(), None);

    assert_eq!(state.set_text_size(3.0).await.unwrap(), 1.5);
}

#[tokio::test]
async fn test_bookmarks_newest_first_across_reload() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;
    state.initialize().await.unwrap();

    state.toggle_bookmark("2").await.unwrap();
    state.toggle_bookmark("4").await.unwrap();
    state.toggle_bookmark("1").await.unwrap();
    assert!(!state.toggle_bookmark("4").await.unwrap());

    let state = load(&db, &Config::default()).await;
    let bookmarks = state.bookmarks();
    let ids: Vec<&str> = bookmarks.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_sessions_feed_stats() {
    let db = Database::open(":memory:").await.unwrap();
    let mut state = load(&db, &Config::default()).await;
    state.initialize().await.unwrap();

    // Too short to count
    let session = state.begin_session("1").await.unwrap();
    assert_eq!(state.end_session(session).await.unwrap(), None);

    // Recorded directly with a known duration
    let id = db.record_session_open("2").await.unwrap();
    db.record_session_close(id, 180).await.unwrap();

    let stats = state.reading_stats(7).await.unwrap();
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.distinct_readings, 1);
    assert_eq!(stats.total_minutes, 3);

    assert!(matches!(
        state.begin_session("missing").await,
        Err(StateError::UnknownReading(_))
    ));
}
