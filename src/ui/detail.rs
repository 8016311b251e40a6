use crate::app::App;
use crate::util::validate_image_url;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the reading preview: metadata, status, and the opening paragraph.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(reading) = app.detail.as_ref() else {
        let paragraph = Paragraph::new("No reading selected")
            .block(Block::default().borders(Borders::ALL).title("Reading"));
        f.render_widget(paragraph, area);
        return;
    };

    let theme = &app.theme;
    let mut lines = vec![
        Line::from(Span::styled(reading.title.clone(), theme.reader_heading)),
        Line::from(Span::styled(format!("by {}", reading.author), theme.reader_metadata)),
        Line::from(""),
        Line::from(vec![
            Span::styled(reading.category.to_string(), theme.category),
            Span::styled(
                format!(" · {} min read", reading.estimated_minutes()),
                theme.item_meta,
            ),
        ]),
    ];

    let mut status = Vec::with_capacity(2);
    if app.state.is_completed(&reading.id) {
        status.push(Span::styled("✓ Completed", theme.item_completed));
    }
    if app.state.is_bookmarked(&reading.id) {
        if !status.is_empty() {
            status.push(Span::raw("   "));
        }
        status.push(Span::styled("★ Bookmarked", theme.bookmark));
    }
    if !status.is_empty() {
        lines.push(Line::from(status));
    }

    // Only show links we would agree to open
    if let Some(url) = reading.image_url.as_deref() {
        if let Ok(parsed) = validate_image_url(url) {
            let host = parsed.host_str().unwrap_or("image").to_string();
            lines.push(Line::from(Span::styled(
                format!("Image: {} (press o to open)", host),
                theme.item_meta,
            )));
        }
    }

    lines.push(Line::from(""));
    if let Some(first) = reading.paragraphs().next() {
        for verse_line in first.lines() {
            lines.push(Line::from(Span::styled(
                verse_line.to_string(),
                theme.reader_body,
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to read the whole piece",
        theme.disabled,
    )));

    // Same column as the reader at the saved text size
    let width = (crate::app::reader_column_width(app.state.preferences().text_size) as u16 + 2)
        .min(area.width);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, column);
}
