//! Welcome screen shown until the user finishes onboarding.

use crate::app::{App, OnboardingRow};
use crate::catalog::Category;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const PANEL_WIDTH: u16 = 56;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.onboarding;
    let theme = &app.theme;
    let cursor = form.row();

    let row_style = |row: OnboardingRow, base: Style| {
        if row == cursor {
            theme.item_selected
        } else {
            base
        }
    };

    let mut lines = vec![
        Line::from(Span::styled("Welcome to Ray", theme.header_title)),
        Line::from(Span::styled(
            "A short, thoughtful reading every day.",
            theme.item_meta,
        )),
        Line::from(""),
        Line::from(Span::styled("Choose your categories", theme.section_title)),
    ];

    for category in Category::ALL {
        let checked = form.categories.contains(&category);
        let mark = if checked { "[x]" } else { "[ ]" };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", mark, category),
            row_style(OnboardingRow::Category(category), theme.item_title),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Readings per day   ", theme.section_title),
        Span::styled(
            format!("‹ {} ›", form.readings_per_day),
            row_style(OnboardingRow::ReadingsPerDay, theme.item_title),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Daily reminder     ", theme.section_title),
        Span::styled(
            format!("‹ {} ›", form.reminder_time.label_12h()),
            row_style(OnboardingRow::Reminder, theme.item_title),
        ),
    ]));
    lines.push(Line::from(""));

    let begin_base = if form.can_begin() {
        theme.item_title
    } else {
        theme.disabled
    };
    lines.push(
        Line::from(Span::styled(
            "[ Begin ]",
            row_style(OnboardingRow::Begin, begin_base),
        ))
        .alignment(Alignment::Center),
    );
    if !form.can_begin() {
        lines.push(
            Line::from(Span::styled("Select at least one category", theme.disabled))
                .alignment(Alignment::Center),
        );
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let width = PANEL_WIDTH.min(area.width);
    let panel = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, panel);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border_focused)
                .title(" Ray "),
        ),
        panel,
    );
}
