//! The static reading catalog.
//!
//! Readings are bundled with the binary as a TOML document and are never
//! created or destroyed at runtime. A user may point `catalog_path` (or
//! `--catalog`) at their own file in the same format; it replaces the bundled
//! list wholesale.
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{strip_control_chars, validate_image_url, word_count};

/// Catalog compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("readings.toml");

/// Upper bound on the day counter.
pub const TOTAL_DAYS: u32 = 1000;

/// Choices offered for "readings per day".
pub const READINGS_PER_DAY_OPTIONS: [u32; 3] = [1, 2, 3];

/// Reading speed used when a reading has no explicit `reading_time`.
const WORDS_PER_MINUTE: usize = 200;

/// Largest catalog file accepted from disk (4 MB).
const MAX_CATALOG_FILE_SIZE: u64 = 4 * 1_048_576;

// ============================================================================
// Text Size
// ============================================================================

/// A named text-size preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSizeOption {
    pub label: &'static str,
    pub value: f32,
}

pub const TEXT_SIZE_OPTIONS: [TextSizeOption; 4] = [
    TextSizeOption { label: "S", value: 0.8 },
    TextSizeOption { label: "M", value: 1.0 },
    TextSizeOption { label: "L", value: 1.2 },
    TextSizeOption { label: "XL", value: 1.5 },
];

pub const MIN_TEXT_SIZE: f32 = 0.8;
pub const MAX_TEXT_SIZE: f32 = 1.5;
/// Increment used by the reader's +/- keys.
pub const TEXT_SIZE_STEP: f32 = 0.1;

/// Label of the preset closest to `value`.
pub fn text_size_label(value: f32) -> &'static str {
    TEXT_SIZE_OPTIONS
        .iter()
        .min_by(|a, b| {
            (a.value - value)
                .abs()
                .total_cmp(&(b.value - value).abs())
        })
        .map(|o| o.label)
        .unwrap_or("M")
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog file too large: {0} bytes")]
    TooLarge(u64),

    #[error("Catalog contains no readings")]
    Empty,

    #[error("Duplicate reading id '{0}'")]
    DuplicateId(String),

    #[error("Reading '{id}': invalid {field}: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: String,
    },
}

// ============================================================================
// Category
// ============================================================================

/// Reading categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Philosophy,
    Literature,
    Poetry,
    Science,
    History,
    Art,
    Essays,
    Film,
    Psychology,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Philosophy,
        Self::Literature,
        Self::Poetry,
        Self::Science,
        Self::History,
        Self::Art,
        Self::Essays,
        Self::Film,
        Self::Psychology,
    ];

    /// Categories selected for a new user.
    pub const DEFAULT_SELECTION: [Category; 3] =
        [Self::Philosophy, Self::Literature, Self::Poetry];

    pub fn name(self) -> &'static str {
        match self {
            Self::Philosophy => "Philosophy",
            Self::Literature => "Literature",
            Self::Poetry => "Poetry",
            Self::Science => "Science",
            Self::History => "History",
            Self::Art => "Art",
            Self::Essays => "Essays",
            Self::Film => "Film",
            Self::Psychology => "Psychology",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Reading
// ============================================================================

/// A single short piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: Category,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Author-supplied reading time in minutes.
    #[serde(default)]
    pub reading_time: Option<u32>,
}

impl Reading {
    /// Minutes to read: the explicit `reading_time`, else a word-count estimate.
    pub fn estimated_minutes(&self) -> u32 {
        match self.reading_time {
            Some(m) if m > 0 => m,
            _ => {
                let words = word_count(&self.content);
                (words.div_ceil(WORDS_PER_MINUTE) as u32).max(1)
            }
        }
    }

    /// Text offered when the user shares a reading.
    pub fn share_message(&self) -> String {
        format!(
            "I'm reading \"{}\" by {} in the Ray app.",
            self.title, self.author
        )
    }

    /// Content split into paragraphs on blank lines.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    fn sanitize(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.title = strip_control_chars(self.title.trim()).into_owned();
        self.author = strip_control_chars(self.author.trim()).into_owned();
        self.content = strip_control_chars(self.content.trim()).into_owned();
        self.image_url = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |field: &'static str, reason: &str| CatalogError::InvalidField {
            id: self.id.clone(),
            field,
            reason: reason.to_string(),
        };

        if self.id.is_empty() {
            return Err(invalid("id", "must not be empty"));
        }
        if self.title.is_empty() {
            return Err(invalid("title", "must not be empty"));
        }
        if self.content.is_empty() {
            return Err(invalid("content", "must not be empty"));
        }
        if let Some(url) = &self.image_url {
            validate_image_url(url).map_err(|e| invalid("image_url", &e.to_string()))?;
        }
        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    readings: Vec<Reading>,
}

/// Ordered, validated list of readings.
///
/// Readings are held behind `Arc` so schedule views can hand them out
/// without copying the content text.
#[derive(Debug, Clone)]
pub struct Catalog {
    readings: Vec<Arc<Reading>>,
}

impl Catalog {
    /// The catalog bundled with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml(BUNDLED_CATALOG)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CATALOG_FILE_SIZE {
            return Err(CatalogError::TooLarge(meta.len()));
        }
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), readings = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::from_readings(file.readings)
    }

    /// Build a catalog from readings, validating each one.
    pub fn from_readings(readings: Vec<Reading>) -> Result<Self, CatalogError> {
        if readings.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(readings.len());
        let mut out = Vec::with_capacity(readings.len());
        for reading in readings {
            let reading = reading.sanitize();
            reading.validate()?;
            if !seen.insert(reading.id.clone()) {
                return Err(CatalogError::DuplicateId(reading.id));
            }
            out.push(Arc::new(reading));
        }

        Ok(Self { readings: out })
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Arc<Reading>] {
        &self.readings
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Reading>> {
        self.readings.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Readings whose category is selected, in catalog order.
    pub fn filtered(&self, categories: &[Category]) -> Vec<Arc<Reading>> {
        self.readings
            .iter()
            .filter(|r| categories.contains(&r.category))
            .cloned()
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
