//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Headers and lists --
    pub header_title: Style,
    pub header_day: Style,
    pub item_title: Style,
    pub item_selected: Style,
    pub item_completed: Style,
    pub item_meta: Style,
    pub category: Style,
    pub bookmark: Style,
    pub section_title: Style,
    pub disabled: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,

    // -- Chrome --
    pub progress: Style,
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default().add_modifier(Modifier::BOLD),
            header_day: Style::default().fg(Color::Yellow),
            item_title: Style::default().add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_completed: Style::default().fg(Color::Green),
            item_meta: Style::default().fg(Color::Gray),
            category: Style::default().fg(Color::Cyan),
            bookmark: Style::default().fg(Color::Yellow),
            section_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),

            progress: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            header_day: Style::default().fg(Color::Magenta),
            item_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_completed: Style::default().fg(Color::Green),
            item_meta: Style::default().fg(Color::DarkGray),
            category: Style::default().fg(Color::Blue),
            bookmark: Style::default().fg(Color::Magenta),
            section_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::Gray),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),

            progress: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
