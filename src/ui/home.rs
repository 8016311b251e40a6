//! Home screen: today's date, the day counter, today's readings, a glance
//! at previous days, and overall progress.

use super::lists::reading_item;
use crate::app::App;
use crate::catalog::TOTAL_DAYS;
use crate::keybindings::Action;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Previous readings listed on the home screen before "see all".
const PREVIOUS_PREVIEW: usize = 3;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let today = app.state.todays_readings();
    let today_height = (today.len().max(1) as u16) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Date header
            Constraint::Length(today_height), // Today's readings
            Constraint::Min(3),               // Previous days
            Constraint::Length(2),            // Progress
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_today(f, app, chunks[1]);
    render_previous_preview(f, app, chunks[2]);
    render_progress(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let date = app.state.today().format("%A, %B %-d").to_string();
    let mut day_line = vec![Span::styled(
        format!("Day {} of {}", app.state.current_day(), TOTAL_DAYS),
        app.theme.header_day,
    )];

    let prefs = app.state.preferences();
    if let Some(next) = app.state.next_reminder(app.state.now()) {
        let when = if next.date() == app.state.today() {
            "today"
        } else {
            "tomorrow"
        };
        day_line.push(Span::styled(
            format!("   Reminder {} at {}", when, prefs.reminder_time.label_12h()),
            app.theme.item_meta,
        ));
    }

    let lines = vec![
        Line::from(Span::styled(date, app.theme.header_title)),
        Line::from(day_line),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn render_today(f: &mut Frame, app: &App, area: Rect) {
    let today = app.state.todays_readings();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_focused)
        .title(Span::styled(" Today's Reading ", app.theme.section_title));

    if today.is_empty() {
        let settings_key = app.keybindings.key_label(Action::ViewSettings);
        let msg = if app.state.preferences().selected_categories.is_empty() {
            format!("No categories selected. Press {} to choose some in settings.", settings_key)
        } else {
            format!(
                "You have read everything in your categories. Add more in settings ({}).",
                settings_key
            )
        };
        let paragraph = Paragraph::new(msg)
            .style(app.theme.item_meta)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let items: Vec<ListItem> = today
        .iter()
        .enumerate()
        .map(|(i, s)| {
            reading_item(
                &s.reading,
                s.completed,
                app.state.is_bookmarked(&s.reading.id),
                i == app.home_selected,
                inner_width,
                &app.theme,
            )
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_previous_preview(f: &mut Frame, app: &App, area: Rect) {
    let previous = app.state.previous_readings();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border)
        .title(Span::styled(" Previous Days ", app.theme.section_title));

    if previous.is_empty() {
        let paragraph = Paragraph::new("Earlier readings will appear here.")
            .style(app.theme.disabled)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = previous
        .iter()
        .take(PREVIOUS_PREVIEW)
        .map(|s| {
            let mark = if s.completed {
                Span::styled("✓ ", app.theme.item_completed)
            } else {
                Span::raw("  ")
            };
            let label = format!("Day {}  {}", s.day, s.reading.title);
            Line::from(vec![
                mark,
                Span::styled(truncate_to_width(&label, width).into_owned(), app.theme.item_meta),
            ])
        })
        .collect();
    if previous.len() > PREVIOUS_PREVIEW {
        lines.push(Line::from(Span::styled(
            format!(
                "  ... {} more, press {} to see all",
                previous.len() - PREVIOUS_PREVIEW,
                app.keybindings.key_label(Action::ViewPrevious)
            ),
            app.theme.disabled,
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let progress = app.state.progress();
    let label = format!(
        "{} of {} readings completed",
        progress.completed, progress.total
    );
    let gauge = Gauge::default()
        .gauge_style(app.theme.progress)
        .ratio(progress.fraction().clamp(0.0, 1.0))
        .label(label);
    let gauge_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    f.render_widget(gauge, gauge_area);
}
