//! Reading stats panel rendering.

use crate::app::App;
use crate::storage::ReadingStats;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

/// Render the reading stats panel as a centered overlay.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    // Centered panel: 60% width, 80% height (with reasonable minimums)
    let width = (area.width * 60 / 100)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = (area.height * 80 / 100)
        .max(12)
        .min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    if popup.width < 30 || popup.height < 8 {
        return;
    }

    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_focused)
        .title(" Reading Stats ");

    let Some(data) = &app.stats_data else {
        let loading = Paragraph::new("Loading stats...")
            .block(block)
            .alignment(Alignment::Center)
            .style(app.theme.reader_body);
        f.render_widget(loading, popup);
        return;
    };

    let inner_area = block.inner(popup);
    f.render_widget(block, popup);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Journey
            Constraint::Length(1), // Progress gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(4), // Sessions
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Recently read
            Constraint::Length(1), // Footer
        ])
        .split(inner_area);

    let progress = app.state.progress();
    let journey = vec![
        Line::from(vec![
            Span::styled("  Journey:    ", app.theme.section_title),
            Span::raw(format!("Day {} of {}", app.state.current_day(), crate::catalog::TOTAL_DAYS)),
        ]),
        Line::from(vec![
            Span::styled("  Completed:  ", app.theme.section_title),
            Span::raw(format!(
                "{} of {} readings in your categories",
                progress.completed, progress.total
            )),
        ]),
    ];
    f.render_widget(
        Paragraph::new(journey).style(app.theme.reader_body),
        sections[0],
    );

    let gauge_area = Rect {
        x: sections[1].x + 2,
        width: sections[1].width.saturating_sub(4),
        ..sections[1]
    };
    let gauge = Gauge::default()
        .gauge_style(app.theme.progress)
        .ratio(progress.fraction().clamp(0.0, 1.0));
    f.render_widget(gauge, gauge_area);

    let sessions = vec![
        Line::from(Span::styled("  Time spent reading", app.theme.section_title)),
        Line::from(vec![
            Span::styled("    Last 24 hours: ", app.theme.item_meta),
            Span::raw(format_stats_line(&data.last_day)),
        ]),
        Line::from(vec![
            Span::styled("    Last 7 days:   ", app.theme.item_meta),
            Span::raw(format_stats_line(&data.last_week)),
        ]),
        Line::from(vec![
            Span::styled("    Last 30 days:  ", app.theme.item_meta),
            Span::raw(format_stats_line(&data.last_month)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(sessions).style(app.theme.reader_body),
        sections[3],
    );

    let mut recent_lines = vec![Line::from(Span::styled(
        "  Recently read",
        app.theme.section_title,
    ))];
    for entry in &data.recent {
        let title = app
            .state
            .find_reading(&entry.reading_id)
            .map(|r| r.title.clone())
            .unwrap_or_else(|| format!("Reading {}", entry.reading_id));
        let duration = match entry.duration_seconds {
            Some(secs) => format!("{}m", (secs.max(0) as u64).div_ceil(60)),
            None => "open".to_string(),
        };
        recent_lines.push(Line::from(vec![
            Span::raw(format!("    {} ", title)),
            Span::styled(format!("({})", duration), app.theme.item_meta),
        ]));
    }
    if data.recent.is_empty() {
        recent_lines.push(Line::from(Span::styled(
            "    Nothing yet. Open a reading to start.",
            app.theme.disabled,
        )));
    }
    f.render_widget(
        Paragraph::new(recent_lines).style(app.theme.reader_body),
        sections[5],
    );

    let footer = Paragraph::new("  Press Esc to close")
        .style(app.theme.status_bar)
        .alignment(Alignment::Left);
    f.render_widget(footer, sections[6]);
}

/// Format a single stats line: "3 sessions, 2 readings, 14m"
fn format_stats_line(stats: &ReadingStats) -> String {
    if stats.sessions == 0 {
        return "no activity".to_string();
    }

    let time_str = if stats.total_minutes >= 60 {
        format!("{}h {}m", stats.total_minutes / 60, stats.total_minutes % 60)
    } else {
        format!("{}m", stats.total_minutes)
    };

    format!(
        "{} {}, {} {}, {}",
        stats.sessions,
        plural(stats.sessions, "session", "sessions"),
        stats.distinct_readings,
        plural(stats.distinct_readings, "reading", "readings"),
        time_str
    )
}

fn plural(n: u32, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
