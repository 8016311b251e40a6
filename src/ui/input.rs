//! Input handling for the TUI.
//!
//! Resolves key presses through the keybinding registry using the current
//! view's context, then dispatches to the view's handler.

use crate::app::{App, AppEvent, OnboardingRow, View};
use crate::catalog::text_size_label;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_image, spawn_stats_load};
use super::Action;

/// Map the current view to a keybinding context.
fn view_to_context(view: View) -> KbContext {
    match view {
        View::Onboarding => KbContext::Onboarding,
        View::Detail => KbContext::Detail,
        View::Reader => KbContext::Reader,
        View::Settings => KbContext::Settings,
        View::Home | View::Previous | View::Bookmarks | View::Stats => KbContext::Global,
    }
}

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Share overlay: any key dismisses it
    if app.share_message.take().is_some() {
        return Ok(Action::Continue);
    }

    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, view_to_context(app.view))
    else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
            return Ok(Action::Continue);
        }
        KbAction::ViewBookmarks | KbAction::ViewPrevious | KbAction::ViewSettings => {
            let target = match action {
                KbAction::ViewBookmarks => View::Bookmarks,
                KbAction::ViewPrevious => View::Previous,
                _ => View::Settings,
            };
            leave_reader_for(app, target).await;
            return Ok(Action::Continue);
        }
        KbAction::ViewStats => {
            let was_stats = app.view == View::Stats;
            leave_reader_for(app, View::Stats).await;
            if app.view == View::Stats && !was_stats {
                spawn_stats_load(app.db.clone(), event_tx.clone());
            }
            return Ok(Action::Continue);
        }
        _ => {}
    }

    match app.view {
        View::Onboarding => handle_onboarding_input(app, action).await?,
        View::Home | View::Previous | View::Bookmarks => handle_list_input(app, action),
        View::Detail => handle_detail_input(app, action).await?,
        View::Reader => handle_reader_input(app, action).await?,
        View::Settings => handle_settings_input(app, action).await?,
        View::Stats => {
            if action == KbAction::Back {
                app.view = View::Home;
                app.stats_data = None;
            }
        }
    }
    Ok(Action::Continue)
}

/// Close the reader (recording the session) before jumping to another screen.
async fn leave_reader_for(app: &mut App, target: View) {
    if !app.state.is_onboarded() || app.view == View::Onboarding {
        return;
    }
    if app.view == View::Reader {
        app.exit_reader().await;
    }
    if app.view == View::Detail {
        app.close_detail();
    }
    app.show_view(target);
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let max = super::help::row_count(app).saturating_sub(1);
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1).min(max);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

async fn handle_onboarding_input(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Increase => app.onboarding.adjust(true),
        KbAction::Decrease => app.onboarding.adjust(false),
        KbAction::Toggle | KbAction::Select => match app.onboarding.row() {
            OnboardingRow::Category(c) => app.onboarding.toggle_category(c),
            OnboardingRow::Begin => app.begin().await?,
            // Enter on a value row moves on to the next row
            OnboardingRow::ReadingsPerDay | OnboardingRow::Reminder => app.nav_down(),
        },
        _ => {}
    }
    Ok(())
}

/// Home, previous days, and bookmarks share list navigation.
fn handle_list_input(app: &mut App, action: KbAction) {
    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Select => {
            if let Some(reading) = app.selected_reading() {
                app.open_detail(reading);
            }
        }
        KbAction::Back if app.view != View::Home => {
            app.view = View::Home;
            app.clamp_selections();
        }
        _ => {}
    }
}

async fn handle_detail_input(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::Select => app.enter_reader().await,
        KbAction::Back => app.close_detail(),
        KbAction::ToggleBookmark => toggle_bookmark(app).await?,
        KbAction::OpenImage => open_image(app),
        KbAction::Share => {
            app.share_message = app.detail.as_ref().map(|r| r.share_message());
        }
        _ => {}
    }
    Ok(())
}

async fn handle_reader_input(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::Back => {
            app.exit_reader().await;
            return Ok(());
        }
        KbAction::Complete => return app.complete_reading().await,
        KbAction::ToggleBookmark => return toggle_bookmark(app).await,
        KbAction::Share => {
            app.share_message = app.reader.as_ref().map(|r| r.reading.share_message());
            return Ok(());
        }
        _ => {}
    }

    let Some(reader) = app.reader.as_mut() else {
        return Ok(());
    };
    let page = reader.visible_lines.saturating_sub(1).max(1);
    match action {
        KbAction::ScrollDown => reader.scroll_down(1),
        KbAction::ScrollUp => reader.scroll_up(1),
        KbAction::PageDown => reader.scroll_down(page),
        KbAction::PageUp => reader.scroll_up(page),
        KbAction::TextLarger | KbAction::TextSmaller => {
            let size = reader.adjust_text_size(action == KbAction::TextLarger);
            app.set_status(format!("Text size {} ({:.1}x)", text_size_label(size), size));
        }
        _ => {}
    }
    Ok(())
}

async fn handle_settings_input(app: &mut App, action: KbAction) -> Result<()> {
    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Toggle | KbAction::Select => app.adjust_setting(None).await?,
        KbAction::Increase => app.adjust_setting(Some(true)).await?,
        KbAction::Decrease => app.adjust_setting(Some(false)).await?,
        KbAction::Back => {
            app.view = View::Home;
            app.clamp_selections();
        }
        _ => {}
    }
    Ok(())
}

/// Toggle the bookmark on the reading being previewed or read.
async fn toggle_bookmark(app: &mut App) -> Result<()> {
    let reading = match (&app.reader, &app.detail) {
        (Some(reader), _) => reader.reading.clone(),
        (None, Some(reading)) => reading.clone(),
        (None, None) => return Ok(()),
    };
    let bookmarked = app.state.toggle_bookmark(&reading.id).await?;
    if bookmarked {
        app.set_status(format!("Bookmarked \"{}\"", reading.title));
    } else {
        app.set_status("Bookmark removed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::state::ReadingState;
    use crate::storage::Database;
    use chrono::NaiveDate;
    use std::sync::Arc;

    async fn test_app() -> (App, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        let db = Database::open(":memory:").await.unwrap();
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        ));
        let config = Config::default();
        let state = ReadingState::load(
            db.clone(),
            Arc::new(Catalog::bundled().unwrap()),
            &config,
            clock,
        )
        .await
        .unwrap();
        let (tx, rx) = mpsc::channel(8);
        (App::new(db, state, &config), tx, rx)
    }

    async fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).await.unwrap()
    }

    async fn onboard(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
        for _ in 0..OnboardingRow::COUNT {
            press(app, tx, KeyCode::Down).await;
        }
        press(app, tx, KeyCode::Enter).await;
        assert_eq!(app.view, View::Home);
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, tx, _rx) = test_app().await;
        assert!(matches!(
            press(&mut app, &tx, KeyCode::Char('q')).await,
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_onboarding_by_keyboard() {
        let (mut app, tx, _rx) = test_app().await;
        // Untick Philosophy, tick Science
        press(&mut app, &tx, KeyCode::Char(' ')).await;
        for _ in 0..3 {
            press(&mut app, &tx, KeyCode::Down).await;
        }
        press(&mut app, &tx, KeyCode::Char(' ')).await;
        onboard(&mut app, &tx).await;

        assert_eq!(
            app.state.preferences().selected_categories,
            vec![Category::Literature, Category::Poetry, Category::Science]
        );
    }

    #[tokio::test]
    async fn test_list_keys_ignored_before_onboarding() {
        let (mut app, tx, _rx) = test_app().await;
        press(&mut app, &tx, KeyCode::Char('p')).await;
        press(&mut app, &tx, KeyCode::Char(',')).await;
        assert_eq!(app.view, View::Onboarding);
    }

    #[tokio::test]
    async fn test_open_read_complete() {
        let (mut app, tx, _rx) = test_app().await;
        onboard(&mut app, &tx).await;

        press(&mut app, &tx, KeyCode::Enter).await;
        assert_eq!(app.view, View::Detail);
        press(&mut app, &tx, KeyCode::Enter).await;
        assert_eq!(app.view, View::Reader);
        press(&mut app, &tx, KeyCode::Char('c')).await;

        assert_eq!(app.view, View::Home);
        assert_eq!(app.state.progress().completed, 1);
    }

    #[tokio::test]
    async fn test_bookmark_from_detail() {
        let (mut app, tx, _rx) = test_app().await;
        onboard(&mut app, &tx).await;

        press(&mut app, &tx, KeyCode::Enter).await;
        press(&mut app, &tx, KeyCode::Char('b')).await;
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.state.bookmarks().len(), 1);

        press(&mut app, &tx, KeyCode::Esc).await;
        press(&mut app, &tx, KeyCode::Char('b')).await;
        assert_eq!(app.view, View::Bookmarks);
    }

    #[tokio::test]
    async fn test_share_overlay_dismissed_by_any_key() {
        let (mut app, tx, _rx) = test_app().await;
        onboard(&mut app, &tx).await;
        press(&mut app, &tx, KeyCode::Enter).await;
        press(&mut app, &tx, KeyCode::Char('s')).await;
        assert!(app.share_message.as_ref().unwrap().contains("in the Ray app"));

        // Dismissing does not also act on the key
        press(&mut app, &tx, KeyCode::Char('q')).await;
        assert!(app.share_message.is_none());
        assert_eq!(app.view, View::Detail);
    }

    #[tokio::test]
    async fn test_reader_text_size_keys() {
        let (mut app, tx, _rx) = test_app().await;
        onboard(&mut app, &tx).await;
        press(&mut app, &tx, KeyCode::Enter).await;
        press(&mut app, &tx, KeyCode::Enter).await;

        handle_input(&mut app, KeyCode::Char('+'), KeyModifiers::SHIFT, &tx)
            .await
            .unwrap();
        assert_eq!(app.reader.as_ref().unwrap().text_size, 1.1);
        press(&mut app, &tx, KeyCode::Char('-')).await;
        press(&mut app, &tx, KeyCode::Char('-')).await;
        assert_eq!(app.reader.as_ref().unwrap().text_size, 0.9);
    }

    #[tokio::test]
    async fn test_stats_view_spawns_load() {
        let (mut app, tx, mut rx) = test_app().await;
        onboard(&mut app, &tx).await;
        press(&mut app, &tx, KeyCode::Char('i')).await;
        assert_eq!(app.view, View::Stats);
        assert!(matches!(rx.recv().await, Some(AppEvent::StatsLoaded(Ok(_)))));

        press(&mut app, &tx, KeyCode::Esc).await;
        assert_eq!(app.view, View::Home);
    }

    #[tokio::test]
    async fn test_help_toggle_and_scroll() {
        let (mut app, tx, _rx) = test_app().await;
        press(&mut app, &tx, KeyCode::Char('?')).await;
        assert!(app.show_help);
        press(&mut app, &tx, KeyCode::Char('j')).await;
        assert_eq!(app.help_scroll_offset, 1);
        press(&mut app, &tx, KeyCode::Esc).await;
        assert!(!app.show_help);
        assert_eq!(app.view, View::Onboarding);
    }

    #[tokio::test]
    async fn test_settings_keys() {
        let (mut app, tx, _rx) = test_app().await;
        onboard(&mut app, &tx).await;
        press(&mut app, &tx, KeyCode::Char(',')).await;
        assert_eq!(app.view, View::Settings);

        press(&mut app, &tx, KeyCode::Char(' ')).await;
        assert!(!app.state.preferences().notifications_enabled);
        press(&mut app, &tx, KeyCode::Down).await;
        press(&mut app, &tx, KeyCode::Right).await;
        assert_eq!(app.state.preferences().reminder_time.hours, 22);

        press(&mut app, &tx, KeyCode::Esc).await;
        assert_eq!(app.view, View::Home);
    }
}
