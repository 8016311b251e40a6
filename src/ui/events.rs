//! Application event handling.
//!
//! Processes results sent back by background tasks.

use crate::app::{App, AppEvent, View};

/// Apply a background task result to the app state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::StatsLoaded(result) => {
            // The user may have left the stats screen while the query ran
            if app.view != View::Stats {
                return;
            }
            match result {
                Ok(data) => {
                    app.stats_data = Some(data);
                }
                Err(error) => {
                    tracing::warn!(%error, "Failed to load reading stats");
                    app.set_status(format!("Failed to load stats: {}", error));
                    app.view = View::Home;
                }
            }
            app.needs_redraw = true;
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
            app.needs_redraw = true;
        }
    }
}
