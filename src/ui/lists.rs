//! Previous-days and bookmarks screens, plus the reading row shared with home.

use crate::app::{App, View};
use crate::catalog::Reading;
use crate::theme::ColorPalette;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// One reading as a list row: check mark, title, author, minutes.
pub(super) fn reading_item(
    reading: &Reading,
    completed: bool,
    bookmarked: bool,
    selected: bool,
    width: u16,
    theme: &ColorPalette,
) -> ListItem<'static> {
    let mut spans = Vec::with_capacity(5);

    if completed {
        spans.push(Span::styled("✓ ", theme.item_completed));
    } else {
        spans.push(Span::raw("  "));
    }

    let meta = format!(
        "  {} · {} · {} min",
        reading.author,
        reading.category,
        reading.estimated_minutes()
    );
    // Leave room for the check mark, bookmark and metadata
    let max_title = (width as usize).saturating_sub(meta.chars().count() + 6).max(10);
    let title_style = if selected {
        theme.item_selected
    } else if completed {
        theme.item_meta
    } else {
        theme.item_title
    };
    spans.push(Span::styled(
        truncate_to_width(&reading.title, max_title).into_owned(),
        title_style,
    ));
    spans.push(Span::styled(meta, theme.item_meta));
    if bookmarked {
        spans.push(Span::styled(" ★", theme.bookmark));
    }

    ListItem::new(Line::from(spans))
}

/// Render the previous-days or bookmarks screen.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Bookmarks => render_bookmarks(f, app, area),
        _ => render_previous(f, app, area),
    }
}

fn render_previous(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border)
        .title(" Previous Days ");

    let previous = app.state.previous_readings();
    if previous.is_empty() {
        let msg = if app.state.current_day() <= 1 {
            "This is your first day. Earlier readings will appear here."
        } else {
            "Nothing scheduled on earlier days."
        };
        let paragraph = Paragraph::new(msg)
            .style(app.theme.item_meta)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let mut items: Vec<ListItem> = Vec::with_capacity(previous.len() * 2);
    let mut selected_item = 0;
    let mut last_day = None;

    for (i, scheduled) in previous.iter().enumerate() {
        if last_day != Some(scheduled.day) {
            if last_day.is_some() {
                items.push(ListItem::new(""));
            }
            let date = app.state.scheduled_date(scheduled.day);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("Day {}", scheduled.day), app.theme.section_title),
                Span::styled(format!(" · {}", date.format("%A, %B %-d")), app.theme.item_meta),
            ])));
            last_day = Some(scheduled.day);
        }
        if i == app.list_selected {
            selected_item = items.len();
        }
        items.push(reading_item(
            &scheduled.reading,
            scheduled.completed,
            app.state.is_bookmarked(&scheduled.reading.id),
            i == app.list_selected,
            inner_width,
            &app.theme,
        ));
    }

    // Selecting the item keeps it scrolled into view
    let mut list_state = ListState::default().with_selected(Some(selected_item));
    f.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn render_bookmarks(f: &mut Frame, app: &App, area: Rect) {
    let bookmarks = app.state.bookmarks();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border)
        .title(format!(" Bookmarks ({}) ", bookmarks.len()));

    if bookmarks.is_empty() {
        let paragraph = Paragraph::new("No bookmarks yet. Press b on a reading to save it.")
            .style(app.theme.item_meta)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let items: Vec<ListItem> = bookmarks
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            reading_item(
                reading,
                app.state.is_completed(&reading.id),
                false,
                i == app.list_selected,
                inner_width,
                &app.theme,
            )
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.list_selected));
    f.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}
