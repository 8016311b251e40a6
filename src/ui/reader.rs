use crate::app::App;
use crate::catalog::text_size_label;
use crate::theme::ColorPalette;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the reader view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Layout may produce zero-sized rects during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    let theme = app.theme.clone();
    let Some(reader) = app.reader.as_mut() else {
        let paragraph = Paragraph::new("No reading open")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    // Narrower column for larger text; borders add 2
    let width = (reader.column_width() as u16 + 2).min(area.width);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    reader.visible_lines = column.height.saturating_sub(2) as usize;
    reader.viewport_width = column.width.saturating_sub(2) as usize;
    // Clamp before rendering so a resize never shows an invalid offset
    reader.clamp_scroll();

    let footer = format!(
        " {}% · Text {} ",
        reader.progress_percent(),
        text_size_label(reader.text_size)
    );
    let reading = &reader.reading;
    let header = vec![
        Line::from(Span::styled(reading.title.clone(), theme.reader_heading)),
        Line::from(Span::styled(
            format!("by {} · {} min read", reading.author, reading.estimated_minutes()),
            theme.reader_metadata,
        )),
        Line::from(""),
    ];

    let text = Text::from_iter(header.into_iter().chain(reader.lines.iter().cloned()));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(Span::styled(
                    format!(" {} ", reading.category),
                    theme.category,
                ))
                .title_bottom(Line::from(Span::styled(footer, theme.progress)).right_aligned()),
        )
        .wrap(Wrap { trim: false })
        .scroll((reader.scroll_offset.min(crate::app::MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, column);
}

/// Convert reading content to styled Lines.
///
/// Content is plain text: paragraphs separated by blank lines, single
/// newlines kept as line breaks so verse keeps its shape. Text is shown
/// literally, whatever punctuation a line starts with. Returns owned Lines
/// so the reader builds them once per open.
pub fn render_content(content: &str, theme: &ColorPalette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(content.lines().count());
    let mut pending_break = false;

    for raw in content.lines() {
        let line = raw.trim_end();
        if line.is_empty() {
            // Runs of blank lines collapse into a single paragraph gap
            pending_break = !lines.is_empty();
            continue;
        }
        if pending_break {
            lines.push(Line::from(""));
            pending_break = false;
        }
        lines.push(Line::from(Span::styled(line.to_string(), theme.reader_body)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(content: &str) -> Vec<Line<'static>> {
        render_content(content, &ThemeVariant::Dark.palette())
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let lines = render("First paragraph.\n\nSecond paragraph.");
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["First paragraph.", "", "Second paragraph."]);
    }

    #[test]
    fn test_verse_keeps_line_breaks() {
        let lines = render("How strange it is\nto gaze skyward\n\nAncient photons");
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec!["How strange it is", "to gaze skyward", "", "Ancient photons"]
        );
    }

    #[test]
    fn test_body_style_from_palette() {
        let theme = ThemeVariant::Light.palette();
        let lines = render_content("A quiet morning.", &theme);
        assert_eq!(lines[0].spans[0].style, theme.reader_body);
    }

    #[test]
    fn test_numbered_line_keeps_number() {
        let lines = render("1984. The year the novel imagined.");
        assert_eq!(plain(&lines[0]), "1984. The year the novel imagined.");
    }

    #[test]
    fn test_dash_verse_lines_stay_separate() {
        let lines = render("- first line of verse\n- second line of verse");
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["- first line of verse", "- second line of verse"]);
    }

    #[test]
    fn test_angle_brackets_and_markup_shown_literally() {
        let lines = render("Between <dawn> and dusk.\n\n# Not a heading\n\n> not a quote *either*");
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec![
                "Between <dawn> and dusk.",
                "",
                "# Not a heading",
                "",
                "> not a quote *either*",
            ]
        );
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let lines = render("\n\nOne.\n\n\n  \nTwo.\n\n");
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["One.", "", "Two."]);
    }

    #[test]
    fn test_indented_verse_keeps_indent() {
        let lines = render("The tide goes out\n    and comes back");
        assert_eq!(plain(&lines[1]), "    and comes back");
    }

    #[test]
    fn test_render_empty() {
        assert!(render("").is_empty());
    }

    #[test]
    fn test_render_unicode() {
        let lines = render("Hello 世界 🌍");
        assert_eq!(plain(&lines[0]), "Hello 世界 🌍");
    }
}
