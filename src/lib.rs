//! Ray: a terminal daily-reading companion.
//!
//! A small catalog of short readings is filtered by the user's categories and
//! handed out a few per day, one calendar day at a time. Preferences,
//! progress, and bookmarks persist in SQLite; reading sessions are timed for
//! the stats screen.

pub mod app;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod keybindings;
pub mod preferences;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
