//! Utility functions shared by the catalog, state and UI layers.
//!
//! - **Text**: Unicode-aware width, truncation, control-character stripping
//!   and word counting.
//! - **URLs**: validation for image links bundled with readings and for
//!   anything handed to the system opener.
//!
//! # Examples
//!
//! ```
//! use ray::util::{truncate_to_width, validate_image_url, word_count};
//!
//! assert_eq!(truncate_to_width("Ode to Starlight", 10), "Ode to...");
//! assert!(validate_image_url("https://images.example.com/a.jpg").is_ok());
//! assert_eq!(word_count("How strange it is"), 4);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width, word_count};
pub use url_validator::{validate_image_url, validate_url_for_open, UrlValidationError};
