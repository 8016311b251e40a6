use crate::app::{App, SettingsRow};
use crate::catalog::{text_size_label, Category, TEXT_SIZE_OPTIONS};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the settings screen.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let prefs = app.state.preferences();
    let cursor = SettingsRow::at(app.settings_selected);
    let value_style = |row: SettingsRow, base: Style| {
        if row == cursor {
            theme.item_selected
        } else {
            base
        }
    };

    let mut lines = vec![Line::from(Span::styled("Notifications", theme.section_title))];

    let on_off = if prefs.notifications_enabled { "On" } else { "Off" };
    lines.push(Line::from(vec![
        Span::styled("  Daily reminder     ", theme.item_title),
        Span::styled(
            format!("[{}]", on_off),
            value_style(SettingsRow::Notifications, theme.item_meta),
        ),
    ]));

    // The time still shows when reminders are off, just dimmed
    let time_base = if prefs.notifications_enabled {
        theme.item_meta
    } else {
        theme.disabled
    };
    lines.push(Line::from(vec![
        Span::styled("  Reminder time      ", theme.item_title),
        Span::styled(
            format!("‹ {} ›", prefs.reminder_time.label_12h()),
            value_style(SettingsRow::ReminderHour, time_base),
        ),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Reading", theme.section_title)));
    lines.push(Line::from(vec![
        Span::styled("  Readings per day   ", theme.item_title),
        Span::styled(
            format!("‹ {} ›", prefs.readings_per_day),
            value_style(SettingsRow::ReadingsPerDay, theme.item_meta),
        ),
    ]));

    let current_size = text_size_label(prefs.text_size);
    let mut size_spans = vec![Span::styled("  Text size          ", theme.item_title)];
    for option in TEXT_SIZE_OPTIONS {
        let style = if option.label == current_size {
            value_style(SettingsRow::TextSize, theme.progress)
        } else {
            theme.disabled
        };
        size_spans.push(Span::styled(format!(" {} ", option.label), style));
    }
    lines.push(Line::from(size_spans));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Categories", theme.section_title)));
    for category in Category::ALL {
        let checked = prefs.selected_categories.contains(&category);
        let mark = if checked { "[x]" } else { "[ ]" };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", mark, category),
            value_style(SettingsRow::Category(category), theme.item_title),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "To start over, run ray --reset",
        theme.disabled,
    )));

    // Keep the cursor row visible on short terminals
    let visible = area.height.saturating_sub(2) as usize;
    let cursor_line = settings_line_index(app.settings_selected);
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(" Settings "),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);
}

/// Line index of a settings row, counting section headings and spacers.
fn settings_line_index(row: usize) -> usize {
    match row {
        0 | 1 => row + 1,
        2 | 3 => row + 3,
        i => i + 5,
    }
}
