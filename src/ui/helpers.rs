//! Helper functions for UI operations.
//!
//! Background task spawning, panic capture, and link opening shared by the
//! input and event handlers.

use crate::app::{App, AppEvent, StatsData};
use crate::storage::Database;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Sessions listed under "Recently read" on the stats screen.
const RECENT_SESSIONS: u32 = 5;

/// Wraps a future to catch panics and convert them to errors.
///
/// Panics in spawned tasks would otherwise vanish inside the runtime; this
/// turns them into `Err(String)` carrying the panic message so the main
/// loop can report them.
///
/// # Example
///
/// ```ignore
/// tokio::spawn(async move {
///     match catch_task_panic(async { do_work().await }).await {
///         Ok(result) => handle_result(result),
///         Err(panic_msg) => {
///             let _ = tx.send(AppEvent::TaskPanicked { task: "work", error: panic_msg }).await;
///         }
///     }
/// });
/// ```
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Query rolling 1/7/30-day stats in the background.
///
/// Sends `AppEvent::StatsLoaded` when done; the handler ignores it if the
/// user has already left the stats screen.
pub(super) fn spawn_stats_load(db: Database, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let result = catch_task_panic(async {
            let last_day = db.get_reading_stats(1).await?;
            let last_week = db.get_reading_stats(7).await?;
            let last_month = db.get_reading_stats(30).await?;
            let recent = db.recent_sessions(RECENT_SESSIONS).await?;
            anyhow::Ok(StatsData {
                last_day,
                last_week,
                last_month,
                recent,
            })
        })
        .await;

        let event = match result {
            Ok(loaded) => AppEvent::StatsLoaded(loaded.map_err(|e| e.to_string())),
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Stats task panicked");
                if let Err(e) = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "stats",
                        error: panic_msg,
                    })
                    .await
                {
                    tracing::warn!(error = %e, event = "TaskPanicked", "Channel send failed (receiver dropped)");
                }
                return;
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, event = "StatsLoaded", "Channel send failed (receiver dropped)");
        }
    });
}

/// Open the previewed reading's image in the system viewer.
pub(super) fn open_image(app: &mut App) {
    let Some(url) = app.detail.as_ref().and_then(|r| r.image_url.clone()) else {
        app.set_status("This reading has no image");
        return;
    };

    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(e);
    } else if let Err(e) = open::that(&url) {
        app.set_status(format!("Failed to open image: {}", e));
    } else {
        tracing::debug!(%url, "Opened image");
        app.set_status("Opened image in your viewer");
    }
}
