use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Borrow the status message; key hints are static
    let (text, style): (Cow<'_, str>, _) = match &app.status_message {
        Some((msg, _)) if is_error(msg) => (Cow::Borrowed(msg.as_ref()), app.theme.status_error),
        Some((msg, _)) => (Cow::Borrowed(msg.as_ref()), app.theme.status_bar),
        None => (Cow::Borrowed(hints(app.view)), app.theme.status_bar),
    };

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}

fn is_error(msg: &str) -> bool {
    ["Error", "Failed", "Refusing", "Internal error"]
        .iter()
        .any(|prefix| msg.starts_with(prefix))
}

/// Key hints shown when no status message is active.
pub(super) fn hints(view: View) -> &'static str {
    match view {
        View::Onboarding => "[j/k]move [Space]toggle [h/l]adjust [Enter]select [q]uit",
        View::Home => {
            "[Enter]open [p]revious [b]ookmarks [,]settings [i]stats [?]help [q]uit"
        }
        View::Detail => "[Enter]read [b]ookmark [o]pen image [s]hare [Esc]back",
        View::Reader => "[j/k]scroll [Space]page [+/-]text size [c]omplete [s]hare [Esc]back",
        View::Previous | View::Bookmarks => "[Enter]open [Esc]back [?]help [q]uit",
        View::Settings => "[j/k]move [Space]toggle [h/l]adjust [Esc]back",
        View::Stats => "[Esc]back [q]uit",
    }
}
