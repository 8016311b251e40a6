//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are looked up per screen context first, then globally, so the
//! same key can mean different things on different screens.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Back,
    Select,
    ShowHelp,
    ViewBookmarks,
    ViewPrevious,
    ViewSettings,
    ViewStats,
    ToggleBookmark,
    OpenImage,
    Share,
    Complete,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    TextLarger,
    TextSmaller,
    Toggle,
    Increase,
    Decrease,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Move down",
            Self::NavUp => "Move up",
            Self::Back => "Go back",
            Self::Select => "Open / confirm",
            Self::ShowHelp => "Show help",
            Self::ViewBookmarks => "Bookmarks",
            Self::ViewPrevious => "Previous readings",
            Self::ViewSettings => "Settings",
            Self::ViewStats => "Reading stats",
            Self::ToggleBookmark => "Toggle bookmark",
            Self::OpenImage => "Open image in browser",
            Self::Share => "Show share message",
            Self::Complete => "Mark complete and return",
            Self::ScrollDown => "Scroll down",
            Self::ScrollUp => "Scroll up",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::TextLarger => "Larger text",
            Self::TextSmaller => "Smaller text",
            Self::Toggle => "Toggle selected option",
            Self::Increase => "Next value",
            Self::Decrease => "Previous value",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Onboarding,
    Detail,
    Reader,
    Settings,
}

impl Context {
    /// Section heading on the help screen.
    pub fn title(self) -> &'static str {
        match self {
            Self::Global => "Everywhere",
            Self::Onboarding => "Welcome",
            Self::Detail => "Reading preview",
            Self::Reader => "Reader",
            Self::Settings => "Settings",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "+"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Backspace", "Space", "PageUp", "PageDown"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    // Named keys (case-insensitive)
    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::ch(c))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for key in keys {
            self.bind(context, *key, action);
        }
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        // === Everywhere ===
        self.bind(Global, KeySpec::ch('q'), Quit);
        self.bind(Global, KeySpec::ctrl('c'), Quit);
        self.bind_all(Global, &[KeySpec::ch('j'), KeySpec::plain(KeyCode::Down)], NavDown);
        self.bind_all(Global, &[KeySpec::ch('k'), KeySpec::plain(KeyCode::Up)], NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Back);
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Select);
        self.bind(Global, KeySpec::ch('?'), ShowHelp);
        self.bind(Global, KeySpec::ch('b'), ViewBookmarks);
        self.bind(Global, KeySpec::ch('p'), ViewPrevious);
        self.bind(Global, KeySpec::ch(','), ViewSettings);
        self.bind(Global, KeySpec::ch('i'), ViewStats);

        // === Onboarding ===
        self.bind(Onboarding, KeySpec::ch(' '), Toggle);
        self.bind_all(
            Onboarding,
            &[KeySpec::ch('l'), KeySpec::plain(KeyCode::Right)],
            Increase,
        );
        self.bind_all(
            Onboarding,
            &[KeySpec::ch('h'), KeySpec::plain(KeyCode::Left)],
            Decrease,
        );

        // === Reading preview ===
        self.bind(Detail, KeySpec::ch('b'), ToggleBookmark);
        self.bind(Detail, KeySpec::ch('o'), OpenImage);
        self.bind(Detail, KeySpec::ch('s'), Share);

        // === Reader ===
        self.bind_all(Reader, &[KeySpec::ch('j'), KeySpec::plain(KeyCode::Down)], ScrollDown);
        self.bind_all(Reader, &[KeySpec::ch('k'), KeySpec::plain(KeyCode::Up)], ScrollUp);
        self.bind_all(
            Reader,
            &[
                KeySpec::ctrl('d'),
                KeySpec::ch(' '),
                KeySpec::plain(KeyCode::PageDown),
            ],
            PageDown,
        );
        self.bind_all(
            Reader,
            &[KeySpec::ctrl('u'), KeySpec::plain(KeyCode::PageUp)],
            PageUp,
        );
        self.bind_all(Reader, &[KeySpec::ch('+'), KeySpec::ch('=')], TextLarger);
        self.bind(Reader, KeySpec::ch('-'), TextSmaller);
        self.bind(Reader, KeySpec::ch('c'), Complete);
        self.bind(Reader, KeySpec::ch('s'), Share);
        self.bind(Reader, KeySpec::ch('b'), ToggleBookmark);

        // === Settings ===
        self.bind_all(
            Settings,
            &[KeySpec::ch(' '), KeySpec::plain(KeyCode::Enter)],
            Toggle,
        );
        self.bind_all(
            Settings,
            &[KeySpec::ch('l'), KeySpec::plain(KeyCode::Right)],
            Increase,
        );
        self.bind_all(
            Settings,
            &[KeySpec::ch('h'), KeySpec::plain(KeyCode::Left)],
            Decrease,
        );
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "complete").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5"). An override
    /// replaces every default key for that action, in every context the
    /// action was bound in.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted symbols ('+', '?') arrive with SHIFT set on most terminals
        let modifiers = match code {
            KeyCode::Char(_) => modifiers & !KeyModifiers::SHIFT,
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }
        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }
        None
    }

    /// First key bound to `action`, formatted for on-screen hints.
    pub fn key_label(&self, action: Action) -> String {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
            .unwrap_or_else(|| "?".to_string())
    }

    /// Bindings for the help screen, grouped by context in registration order.
    ///
    /// Each entry is (context, keys joined with " / ", description).
    pub fn help_rows(&self) -> Vec<(Context, String, &'static str)> {
        let mut rows: Vec<(Context, Action, Vec<String>)> = Vec::new();
        for (ctx, key, action) in &self.bindings {
            match rows
                .iter_mut()
                .find(|(c, a, _)| c == ctx && a == action)
            {
                Some((_, _, keys)) => keys.push(format_key(key)),
                None => rows.push((*ctx, *action, vec![format_key(key)])),
            }
        }
        rows.into_iter()
            .map(|(ctx, action, keys)| (ctx, keys.join(" / "), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Action::Quit,
        "nav_down" | "down" => Action::NavDown,
        "nav_up" | "up" => Action::NavUp,
        "back" => Action::Back,
        "select" | "open" => Action::Select,
        "show_help" | "help" => Action::ShowHelp,
        "view_bookmarks" | "bookmarks" => Action::ViewBookmarks,
        "view_previous" | "previous" => Action::ViewPrevious,
        "view_settings" | "settings" => Action::ViewSettings,
        "view_stats" | "stats" => Action::ViewStats,
        "toggle_bookmark" | "bookmark" => Action::ToggleBookmark,
        "open_image" | "image" => Action::OpenImage,
        "share" => Action::Share,
        "complete" | "mark_complete" => Action::Complete,
        "scroll_down" => Action::ScrollDown,
        "scroll_up" => Action::ScrollUp,
        "page_down" => Action::PageDown,
        "page_up" => Action::PageUp,
        "text_larger" | "larger" => Action::TextLarger,
        "text_smaller" | "smaller" => Action::TextSmaller,
        "toggle" => Action::Toggle,
        "increase" | "next" => Action::Increase,
        "decrease" | "prev" => Action::Decrease,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Tests
// ============================================================================
