//! Render functions for the TUI.
//!
//! Dispatches to the current view's renderer and draws overlays on top.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{detail, help, home, lists, onboarding, reader, settings, stats, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // At truly minimal dimensions, we can't render anything meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main = chunks[0];

    match app.view {
        View::Onboarding => onboarding::render(f, app, main),
        View::Home => home::render(f, app, main),
        View::Detail => detail::render(f, app, main),
        View::Reader => reader::render(f, app, main),
        View::Previous | View::Bookmarks => lists::render(f, app, main),
        View::Settings => settings::render(f, app, main),
        View::Stats => {
            home::render(f, app, main);
            stats::render(f, app, main);
        }
    }
    status::render(f, app, chunks[1]);

    if let Some(message) = app.share_message.as_deref() {
        render_share_overlay(f, app, message);
    }

    // Help goes on top of everything
    if app.show_help {
        help::render(f, app);
    }
}

/// Render the share message centered on screen.
fn render_share_overlay(f: &mut Frame, app: &App, message: &str) {
    let area = f.area();

    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 8u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let text = format!("{}\n\nCopy the text above to share.\n(any key to close)", message);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(" Share "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(app.theme.reader_body);

    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::state::ReadingState;
    use crate::storage::Database;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    async fn test_app() -> App {
        test_app_with(Config::default()).await
    }

    async fn test_app_with(config: Config) -> App {
        let db = Database::open(":memory:").await.unwrap();
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        ));
        let state = ReadingState::load(
            db.clone(),
            Arc::new(Catalog::bundled().unwrap()),
            &config,
            clock,
        )
        .await
        .unwrap();
        App::new(db, state, &config)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_renders_every_view() {
        let mut app = test_app().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("Welcome to Ray"));

        app.begin().await.unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let home = screen_text(&terminal);
        assert!(home.contains("Sunday, October 18"));
        assert!(home.contains("Day 1 of 1000"));

        for view in [View::Previous, View::Bookmarks, View::Settings, View::Stats] {
            app.show_view(view);
            terminal.draw(|f| render(f, &mut app)).unwrap();
        }
        app.view = View::Home;

        let reading = app.selected_reading().unwrap();
        app.open_detail(reading);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        app.enter_reader().await;
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let reader = app.reader.as_ref().unwrap();
        assert!(reader.visible_lines > 0);
        assert_eq!(reader.viewport_width, 72);
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let mut app = test_app().await;
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_bookmarks_empty_message() {
        let mut app = test_app().await;
        app.begin().await.unwrap();
        app.show_view(View::Bookmarks);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("No bookmarks yet"));
    }

    #[tokio::test]
    async fn test_home_hint_uses_rebound_settings_key() {
        let mut config = Config::default();
        config
            .keybindings
            .insert("settings".to_string(), "F2".to_string());
        let mut app = test_app_with(config).await;
        app.begin().await.unwrap();
        app.state.set_selected_categories(Vec::new()).await.unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let home = screen_text(&terminal);
        assert!(home.contains("Press F2 to choose"));
        assert!(!home.contains("Press , to choose"));
    }

    #[tokio::test]
    async fn test_stats_labels_rolling_windows() {
        let mut app = test_app().await;
        app.begin().await.unwrap();
        app.show_view(View::Stats);
        app.stats_data = Some(crate::app::StatsData {
            last_day: Default::default(),
            last_week: Default::default(),
            last_month: Default::default(),
            recent: Vec::new(),
        });

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("Last 24 hours"));
        assert!(screen.contains("Last 7 days"));
        assert!(!screen.contains("Today:"));
    }
}
