//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Shared utility functions
//! - `onboarding`, `home`, `detail`, `reader`, `lists`, `settings` - Screens
//! - `help`, `stats` - Overlays
//! - `status` - Status bar widget

mod detail;
mod events;
mod help;
mod helpers;
mod home;
mod input;
mod lists;
mod loop_runner;
mod onboarding;
pub mod reader;
mod render;
mod settings;
mod stats;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
