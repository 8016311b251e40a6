use crate::catalog::{text_size_label, Category, Reading, TEXT_SIZE_OPTIONS, TEXT_SIZE_STEP};
use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::preferences::{clamp_text_size, ReminderTime};
use crate::state::{ReadingSession, ReadingState};
use crate::storage::{Database, ReadingSessionEntry, ReadingStats};
use crate::theme::{ColorPalette, ThemeVariant};
use crate::ui::reader::render_content;
use anyhow::Result;
use ratatui::text::Line;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Reader column width at text size 1.0; other sizes scale inversely.
pub const BASE_READER_WIDTH: f32 = 72.0;

/// Reminder time step used during onboarding.
const ONBOARDING_REMINDER_STEP: i32 = 15;

// ============================================================================
// Views
// ============================================================================

/// Current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Onboarding,
    Home,
    Detail,
    Reader,
    Previous,
    Bookmarks,
    Settings,
    Stats,
}

/// Aggregated stats for the stats screen.
///
/// Loaded asynchronously when entering `View::Stats`.
///
/// Windows are rolling (measured back from now), not calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsData {
    pub last_day: ReadingStats,
    pub last_week: ReadingStats,
    pub last_month: ReadingStats,
    /// Latest sessions, newest first.
    pub recent: Vec<ReadingSessionEntry>,
}

/// Events sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    StatsLoaded(Result<StatsData, String>),
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Onboarding
// ============================================================================

/// Row under the cursor on the onboarding screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingRow {
    Category(Category),
    ReadingsPerDay,
    Reminder,
    Begin,
}

impl OnboardingRow {
    pub const COUNT: usize = Category::ALL.len() + 3;

    pub fn at(index: usize) -> Self {
        match index {
            i if i < Category::ALL.len() => Self::Category(Category::ALL[i]),
            i if i == Category::ALL.len() => Self::ReadingsPerDay,
            i if i == Category::ALL.len() + 1 => Self::Reminder,
            _ => Self::Begin,
        }
    }
}

/// Choices made on the welcome screen, applied on Begin.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    pub categories: Vec<Category>,
    pub readings_per_day: u32,
    pub reminder_time: ReminderTime,
    pub selected: usize,
}

impl OnboardingForm {
    pub fn from_state(state: &ReadingState) -> Self {
        let prefs = state.preferences();
        Self {
            categories: prefs.selected_categories.clone(),
            readings_per_day: prefs.readings_per_day,
            reminder_time: prefs.reminder_time,
            selected: 0,
        }
    }

    pub fn row(&self) -> OnboardingRow {
        OnboardingRow::at(self.selected)
    }

    pub fn can_begin(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn toggle_category(&mut self, category: Category) {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
            self.categories.sort();
        }
    }

    /// Adjust the value on the current row. `forward` is Right/l.
    pub fn adjust(&mut self, forward: bool) {
        match self.row() {
            OnboardingRow::ReadingsPerDay => {
                self.readings_per_day = if forward {
                    (self.readings_per_day + 1).min(3)
                } else {
                    self.readings_per_day.saturating_sub(1).max(1)
                };
            }
            OnboardingRow::Reminder => {
                let delta = if forward {
                    ONBOARDING_REMINDER_STEP
                } else {
                    -ONBOARDING_REMINDER_STEP
                };
                self.reminder_time = self.reminder_time.shifted(delta);
            }
            OnboardingRow::Category(c) => self.toggle_category(c),
            OnboardingRow::Begin => {}
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Notifications,
    ReminderHour,
    ReadingsPerDay,
    TextSize,
    Category(Category),
}

impl SettingsRow {
    pub const COUNT: usize = 4 + Category::ALL.len();

    pub fn at(index: usize) -> Self {
        match index {
            0 => Self::Notifications,
            1 => Self::ReminderHour,
            2 => Self::ReadingsPerDay,
            3 => Self::TextSize,
            i => Self::Category(Category::ALL[(i - 4).min(Category::ALL.len() - 1)]),
        }
    }
}

/// Next text size option after (or before) `current`, staying at the ends.
pub fn step_text_size_option(current: f32, forward: bool) -> f32 {
    let idx = TEXT_SIZE_OPTIONS
        .iter()
        .position(|o| o.label == text_size_label(current))
        .unwrap_or(1);
    let next = if forward {
        (idx + 1).min(TEXT_SIZE_OPTIONS.len() - 1)
    } else {
        idx.saturating_sub(1)
    };
    TEXT_SIZE_OPTIONS[next].value
}

// ============================================================================
// Reader
// ============================================================================

/// State of the open reader.
pub struct ReaderState {
    pub reading: Arc<Reading>,
    /// Styled content, rendered once on entry.
    pub lines: Vec<Line<'static>>,
    pub scroll_offset: usize,
    /// Session-local text size; starts at the saved preference.
    pub text_size: f32,
    /// Duration tracking; `None` if the session could not be recorded.
    pub session: Option<ReadingSession>,
    /// Visible content lines, updated on each render.
    pub visible_lines: usize,
    /// Content column width, updated on each render.
    pub viewport_width: usize,
    /// (viewport_width, wrapped line count)
    cached_line_count: Option<(usize, usize)>,
}

impl ReaderState {
    /// Header lines above the content: title, byline, blank.
    pub const HEADER_LINES: usize = 3;

    /// Column width for the current text size.
    pub fn column_width(&self) -> usize {
        reader_column_width(self.text_size)
    }

    fn wrapped_line_count(line: &Line<'_>, viewport_width: usize) -> usize {
        let width = viewport_width.max(1);
        let line_width: usize = line.spans.iter().map(|s| s.content.width()).sum();
        if line_width == 0 {
            1
        } else {
            line_width.div_ceil(width)
        }
    }

    /// Total display lines including the header, cached per viewport width.
    pub fn content_lines(&mut self) -> usize {
        let width = self.viewport_width.max(1);
        if let Some((cached_width, count)) = self.cached_line_count {
            if cached_width == width {
                return Self::HEADER_LINES + count;
            }
        }
        let count = self
            .lines
            .iter()
            .map(|l| Self::wrapped_line_count(l, width))
            .sum();
        self.cached_line_count = Some((width, count));
        Self::HEADER_LINES + count
    }

    pub fn max_scroll(&mut self) -> usize {
        self.content_lines()
            .saturating_sub(self.visible_lines)
            .min(MAX_SCROLL)
    }

    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_scroll();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// How far through the text the reader has scrolled, 0-100.
    pub fn progress_percent(&mut self) -> u16 {
        let max = self.max_scroll();
        if max == 0 {
            return 100;
        }
        ((self.scroll_offset.min(max) * 100) / max) as u16
    }

    /// Change the session text size by one step. Returns the new size.
    pub fn adjust_text_size(&mut self, larger: bool) -> f32 {
        let delta = if larger {
            TEXT_SIZE_STEP
        } else {
            -TEXT_SIZE_STEP
        };
        // Round to one decimal so repeated steps land on 1.0, 1.2, ...
        let next = ((self.text_size + delta) * 10.0).round() / 10.0;
        self.text_size = clamp_text_size(next);
        self.cached_line_count = None;
        self.text_size
    }
}

/// Reader column width in terminal cells for a text size.
///
/// ```
/// use ray::app::reader_column_width;
///
/// assert_eq!(reader_column_width(1.0), 72);
/// assert_eq!(reader_column_width(1.5), 48);
/// ```
pub fn reader_column_width(text_size: f32) -> usize {
    (BASE_READER_WIDTH / clamp_text_size(text_size)).round() as usize
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub state: ReadingState,

    pub theme: ColorPalette,
    pub keybindings: KeybindingRegistry,

    pub view: View,
    pub onboarding: OnboardingForm,

    /// Cursor positions per screen
    pub home_selected: usize,
    pub list_selected: usize,
    pub settings_selected: usize,

    /// Reading shown in the preview, and where Back leads from it
    pub detail: Option<Arc<Reading>>,
    pub detail_return: View,

    pub reader: Option<ReaderState>,

    /// Stats loaded asynchronously for View::Stats.
    pub stats_data: Option<StatsData>,

    /// Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Share message overlay, dismissed by any key
    pub share_message: Option<String>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Skip renders when nothing changed
    pub needs_redraw: bool,
}

impl App {
    pub fn new(db: Database, state: ReadingState, config: &Config) -> Self {
        let variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(%warning, "Keybinding override ignored");
        }

        let view = if state.is_onboarded() {
            View::Home
        } else {
            View::Onboarding
        };
        let onboarding = OnboardingForm::from_state(&state);

        let mut app = Self {
            db,
            state,
            theme: variant.palette(),
            keybindings,
            view,
            onboarding,
            home_selected: 0,
            list_selected: 0,
            settings_selected: 0,
            detail: None,
            detail_return: View::Home,
            reader: None,
            stats_data: None,
            status_message: None,
            share_message: None,
            show_help: false,
            help_scroll_offset: 0,
            needs_redraw: true,
        };
        if let Some(first) = warnings.first() {
            app.set_status(first.clone());
        }
        app
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Number of selectable rows on the current screen.
    pub fn list_len(&self) -> usize {
        match self.view {
            View::Onboarding => OnboardingRow::COUNT,
            View::Home => self.state.todays_readings().len(),
            View::Previous => self.state.previous_readings().len(),
            View::Bookmarks => self.state.bookmarks().len(),
            View::Settings => SettingsRow::COUNT,
            View::Detail | View::Reader | View::Stats => 0,
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut usize> {
        match self.view {
            View::Onboarding => Some(&mut self.onboarding.selected),
            View::Home => Some(&mut self.home_selected),
            View::Previous | View::Bookmarks => Some(&mut self.list_selected),
            View::Settings => Some(&mut self.settings_selected),
            View::Detail | View::Reader | View::Stats => None,
        }
    }

    pub fn nav_down(&mut self) {
        let len = self.list_len();
        if let Some(cursor) = self.cursor_mut() {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        }
    }

    pub fn nav_up(&mut self) {
        if let Some(cursor) = self.cursor_mut() {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Keep cursors inside their lists after the lists change.
    pub fn clamp_selections(&mut self) {
        let home_len = self.state.todays_readings().len();
        self.home_selected = self.home_selected.min(home_len.saturating_sub(1));
        let list_len = match self.view {
            View::Bookmarks => self.state.bookmarks().len(),
            _ => self.state.previous_readings().len(),
        };
        self.list_selected = self.list_selected.min(list_len.saturating_sub(1));
    }

    /// Switch to a top-level list screen. Ignored before onboarding.
    pub fn show_view(&mut self, view: View) {
        if !self.state.is_onboarded() || self.view == View::Onboarding {
            return;
        }
        if view == View::Stats {
            self.stats_data = None;
        }
        if matches!(view, View::Previous | View::Bookmarks) && view != self.view {
            self.list_selected = 0;
        }
        self.view = view;
    }

    /// Reading under the cursor on the current list screen.
    pub fn selected_reading(&self) -> Option<Arc<Reading>> {
        match self.view {
            View::Home => self
                .state
                .todays_readings()
                .into_iter()
                .nth(self.home_selected)
                .map(|s| s.reading),
            View::Previous => self
                .state
                .previous_readings()
                .into_iter()
                .nth(self.list_selected)
                .map(|s| s.reading),
            View::Bookmarks => self.state.bookmarks().into_iter().nth(self.list_selected),
            _ => None,
        }
    }

    pub fn open_detail(&mut self, reading: Arc<Reading>) {
        self.detail_return = match self.view {
            View::Detail | View::Reader => self.detail_return,
            other => other,
        };
        self.detail = Some(reading);
        self.view = View::Detail;
    }

    /// Leave the preview for the screen it was opened from.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.view = self.detail_return;
        self.clamp_selections();
    }

    // ========================================================================
    // Reader
    // ========================================================================

    /// Open the reader on the previewed reading and start a session.
    pub async fn enter_reader(&mut self) {
        let Some(reading) = self.detail.clone() else {
            return;
        };
        let session = match self.state.begin_session(&reading.id).await {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "Could not start reading session");
                None
            }
        };
        let lines = render_content(&reading.content, &self.theme);
        self.reader = Some(ReaderState {
            reading,
            lines,
            scroll_offset: 0,
            text_size: self.state.preferences().text_size,
            session,
            visible_lines: 0,
            viewport_width: 0,
            cached_line_count: None,
        });
        self.view = View::Reader;
    }

    /// Close the reader, recording the session. Returns to the preview.
    pub async fn exit_reader(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            if let Some(session) = reader.session.take() {
                if let Err(e) = self.state.end_session(session).await {
                    tracing::warn!(error = %e, "Could not record reading session");
                }
            }
        }
        if self.view == View::Reader {
            self.view = View::Detail;
        }
    }

    /// Mark the open reading complete, close the reader and the preview.
    pub async fn complete_reading(&mut self) -> Result<()> {
        let Some(id) = self.reader.as_ref().map(|r| r.reading.id.clone()) else {
            return Ok(());
        };
        let newly = self.state.mark_completed(&id).await?;
        self.exit_reader().await;
        self.close_detail();
        if newly {
            let progress = self.state.progress();
            self.set_status(format!(
                "Completed. {} of {} readings done",
                progress.completed, progress.total
            ));
        }
        Ok(())
    }

    /// Record any open reader session before exit.
    pub async fn shutdown(&mut self) {
        self.exit_reader().await;
    }

    // ========================================================================
    // Onboarding and Settings
    // ========================================================================

    /// Apply the onboarding form and finish onboarding.
    pub async fn begin(&mut self) -> Result<()> {
        if !self.onboarding.can_begin() {
            self.set_status("Select at least one category to begin");
            return Ok(());
        }
        let form = self.onboarding.clone();
        self.state
            .set_selected_categories(form.categories.clone())
            .await?;
        self.state
            .set_readings_per_day(form.readings_per_day)
            .await?;
        self.state
            .set_reminder_time(form.reminder_time.hours, form.reminder_time.minutes)
            .await?;
        self.state.initialize().await?;

        self.view = View::Home;
        self.home_selected = 0;
        self.set_status("Welcome to Ray. Here is today's reading");
        Ok(())
    }

    /// Apply a settings change on the current row.
    ///
    /// `forward` is `None` for a toggle, `Some(true)` for next value.
    pub async fn adjust_setting(&mut self, forward: Option<bool>) -> Result<()> {
        let prefs = self.state.preferences().clone();
        match (SettingsRow::at(self.settings_selected), forward) {
            (SettingsRow::Notifications, _) => {
                self.state
                    .set_notifications_enabled(!prefs.notifications_enabled)
                    .await?;
            }
            (SettingsRow::ReminderHour, dir) => {
                let delta = if dir == Some(false) { -60 } else { 60 };
                let t = prefs.reminder_time.shifted(delta);
                self.state.set_reminder_time(t.hours, t.minutes).await?;
            }
            (SettingsRow::ReadingsPerDay, dir) => {
                let n = match dir {
                    Some(false) => prefs.readings_per_day.saturating_sub(1).max(1),
                    Some(true) => (prefs.readings_per_day + 1).min(3),
                    None => prefs.readings_per_day % 3 + 1,
                };
                self.state.set_readings_per_day(n).await?;
            }
            (SettingsRow::TextSize, dir) => {
                let size = step_text_size_option(prefs.text_size, dir != Some(false));
                self.state.set_text_size(size).await?;
            }
            (SettingsRow::Category(c), _) => {
                let selected = self.state.toggle_category(c).await?;
                if !selected && self.state.preferences().selected_categories.is_empty() {
                    self.set_status("No categories selected: there is nothing to read");
                }
            }
        }
        self.clamp_selections();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use tokio::time;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        ));
        let catalog = Arc::new(Catalog::bundled().unwrap());
        let config = Config::default();
        let state = ReadingState::load(db.clone(), catalog, &config, clock)
            .await
            .unwrap();
        App::new(db, state, &config)
    }

    async fn onboarded_app() -> App {
        let mut app = test_app().await;
        app.begin().await.unwrap();
        app
    }

    #[tokio::test]
    async fn test_starts_on_onboarding() {
        let app = test_app().await;
        assert_eq!(app.view, View::Onboarding);
        assert_eq!(app.onboarding.categories, Category::DEFAULT_SELECTION.to_vec());
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        // Create app before pausing time to avoid DB connection timeout
        let mut app = test_app().await;
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_begin_requires_a_category() {
        let mut app = test_app().await;
        app.onboarding.categories.clear();
        app.begin().await.unwrap();

        assert_eq!(app.view, View::Onboarding);
        assert!(!app.state.is_onboarded());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_begin_applies_form() {
        let mut app = test_app().await;
        app.onboarding.selected = Category::ALL.len(); // readings per day row
        app.onboarding.adjust(true);
        app.onboarding.selected = Category::ALL.len() + 1; // reminder row
        app.onboarding.adjust(false);
        app.begin().await.unwrap();

        assert_eq!(app.view, View::Home);
        let prefs = app.state.preferences();
        assert_eq!(prefs.readings_per_day, 2);
        assert_eq!(prefs.reminder_time, ReminderTime::new(20, 45).unwrap());
        assert!(app.state.is_onboarded());
    }

    #[tokio::test]
    async fn test_onboarding_readings_per_day_bounds() {
        let mut app = test_app().await;
        app.onboarding.selected = Category::ALL.len();
        app.onboarding.adjust(false);
        assert_eq!(app.onboarding.readings_per_day, 1);
        for _ in 0..5 {
            app.onboarding.adjust(true);
        }
        assert_eq!(app.onboarding.readings_per_day, 3);
    }

    #[tokio::test]
    async fn test_nav_stays_in_bounds() {
        let mut app = onboarded_app().await;
        let len = app.list_len();
        for _ in 0..len + 3 {
            app.nav_down();
        }
        assert_eq!(app.home_selected, len.saturating_sub(1));
        for _ in 0..len + 3 {
            app.nav_up();
        }
        assert_eq!(app.home_selected, 0);
    }

    #[tokio::test]
    async fn test_views_locked_before_onboarding() {
        let mut app = test_app().await;
        app.show_view(View::Settings);
        assert_eq!(app.view, View::Onboarding);
    }

    #[tokio::test]
    async fn test_detail_returns_to_origin() {
        let mut app = onboarded_app().await;
        app.show_view(View::Bookmarks);
        let reading = app.state.find_reading("1").unwrap();
        app.open_detail(reading);
        assert_eq!(app.view, View::Detail);

        app.close_detail();
        assert_eq!(app.view, View::Bookmarks);
        assert!(app.detail.is_none());
    }

    #[tokio::test]
    async fn test_reader_complete_flow() {
        let mut app = onboarded_app().await;
        let reading = app.selected_reading().unwrap();
        app.open_detail(reading.clone());
        app.enter_reader().await;
        assert_eq!(app.view, View::Reader);
        assert!(app.reader.as_ref().unwrap().session.is_some());

        app.complete_reading().await.unwrap();
        assert_eq!(app.view, View::Home);
        assert!(app.reader.is_none());
        assert!(app.state.is_completed(&reading.id));
    }

    #[tokio::test]
    async fn test_exit_reader_goes_back_to_detail() {
        let mut app = onboarded_app().await;
        let reading = app.selected_reading().unwrap();
        app.open_detail(reading);
        app.enter_reader().await;
        app.exit_reader().await;
        assert_eq!(app.view, View::Detail);
    }

    #[tokio::test]
    async fn test_reader_text_size_steps() {
        let mut app = onboarded_app().await;
        let reading = app.selected_reading().unwrap();
        app.open_detail(reading);
        app.enter_reader().await;
        let reader = app.reader.as_mut().unwrap();

        assert_eq!(reader.adjust_text_size(true), 1.1);
        assert_eq!(reader.adjust_text_size(true), 1.2);
        for _ in 0..10 {
            reader.adjust_text_size(true);
        }
        assert_eq!(reader.text_size, 1.5);
        assert_eq!(reader.column_width(), 48);
        for _ in 0..20 {
            reader.adjust_text_size(false);
        }
        assert_eq!(reader.text_size, 0.8);
        assert_eq!(reader.column_width(), 90);

        // Session-local: the saved preference is untouched
        assert_eq!(app.state.preferences().text_size, 1.0);
    }

    #[tokio::test]
    async fn test_reader_scroll_and_progress() {
        let mut app = onboarded_app().await;
        let reading = app.selected_reading().unwrap();
        app.open_detail(reading);
        app.enter_reader().await;
        let reader = app.reader.as_mut().unwrap();
        reader.viewport_width = 40;
        reader.visible_lines = 5;

        assert_eq!(reader.progress_percent(), 0);
        reader.scroll_down(usize::MAX / 2);
        let max = reader.max_scroll();
        assert!(max > 0);
        assert_eq!(reader.scroll_offset, max);
        assert_eq!(reader.progress_percent(), 100);
        reader.scroll_up(usize::MAX);
        assert_eq!(reader.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_settings_adjustments() {
        let mut app = onboarded_app().await;
        app.show_view(View::Settings);

        app.settings_selected = 0;
        app.adjust_setting(None).await.unwrap();
        assert!(!app.state.preferences().notifications_enabled);

        app.settings_selected = 1;
        app.adjust_setting(Some(false)).await.unwrap();
        assert_eq!(
            app.state.preferences().reminder_time,
            ReminderTime::new(20, 0).unwrap()
        );

        app.settings_selected = 2;
        app.adjust_setting(None).await.unwrap();
        assert_eq!(app.state.preferences().readings_per_day, 2);

        app.settings_selected = 3;
        app.adjust_setting(Some(true)).await.unwrap();
        assert_eq!(app.state.preferences().text_size, 1.2);

        app.settings_selected = 4; // Philosophy
        app.adjust_setting(None).await.unwrap();
        assert!(!app
            .state
            .preferences()
            .selected_categories
            .contains(&Category::Philosophy));
    }

    #[test]
    fn test_text_size_option_steps() {
        assert_eq!(step_text_size_option(1.0, true), 1.2);
        assert_eq!(step_text_size_option(1.5, true), 1.5);
        assert_eq!(step_text_size_option(0.8, false), 0.8);
        assert_eq!(step_text_size_option(1.2, false), 1.0);
    }

    #[test]
    fn test_rows_cover_every_category() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(OnboardingRow::at(i), OnboardingRow::Category(*c));
            assert_eq!(SettingsRow::at(i + 4), SettingsRow::Category(*c));
        }
        assert_eq!(OnboardingRow::at(OnboardingRow::COUNT - 1), OnboardingRow::Begin);
    }
}
