//! Raw theme documents, as authored.
//!
//! Two authoring conventions are accepted in one shape:
//!
//! - TextMate style: rules under `settings`
//! - VS Code style: rules under `tokenColors`, with an optional `include`
//!   pointing at a parent theme
//!
//! ```json
//! {
//!   "name": "Dark+",
//!   "include": "./dark_vs.json",
//!   "tokenColors": [
//!     { "scope": "comment", "settings": { "foreground": "#6A9955" } },
//!     { "scope": ["string", "string.quoted"], "settings": { "fontStyle": "italic" } }
//!   ]
//! }
//! ```
//!
//! Deserialization is lenient. A field holding a value of the
//! wrong shape is read as absent rather than rejecting the whole document,
//! so only text that is not JSON/YAML at all (or not a mapping at the top)
//! produces a [`ThemeError`].

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, ThemeError};

/// File extensions understood by [`RawTheme::from_path`].
pub const THEME_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// A theme document before resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTheme {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Reference to a parent theme, resolved through a [`ThemeLookup`](crate::ThemeLookup).
    #[serde(default, deserialize_with = "lenient_string")]
    pub include: Option<String>,
    #[serde(default, deserialize_with = "lenient_settings")]
    pub settings: Option<Vec<RawThemeSetting>>,
    #[serde(default, deserialize_with = "lenient_settings")]
    pub token_colors: Option<Vec<RawThemeSetting>>,
}

/// One styling rule entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawThemeSetting {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub scope: ScopeSelector,
    #[serde(default, deserialize_with = "lenient_style")]
    pub settings: Option<RawStyle>,
}

/// The style payload of a rule entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStyle {
    #[serde(default, deserialize_with = "lenient_string")]
    pub font_style: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub foreground: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Which scopes a rule entry targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScopeSelector {
    /// A comma-separated selector string, e.g. `"comment, string.quoted"`.
    Single(String),
    /// A list of selectors, used verbatim.
    Many(Vec<String>),
    /// No usable selector; the entry applies to the theme defaults.
    #[default]
    Absent,
}

impl ScopeSelector {
    /// Normalizes the selector into its individual selector strings.
    ///
    /// Empty comma pieces are dropped. `Absent`, and a string with no
    /// pieces left, yield the single empty selector.
    pub fn selectors(&self) -> Vec<String> {
        match self {
            ScopeSelector::Single(s) => {
                let pieces: Vec<String> = s
                    .split(',')
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string)
                    .collect();
                if pieces.is_empty() {
                    vec![String::new()]
                } else {
                    pieces
                }
            }
            ScopeSelector::Many(list) => list.clone(),
            ScopeSelector::Absent => vec![String::new()],
        }
    }
}

impl From<&str> for ScopeSelector {
    fn from(s: &str) -> Self {
        ScopeSelector::Single(s.to_string())
    }
}

impl From<String> for ScopeSelector {
    fn from(s: String) -> Self {
        ScopeSelector::Single(s)
    }
}

impl From<Vec<&str>> for ScopeSelector {
    fn from(list: Vec<&str>) -> Self {
        ScopeSelector::Many(list.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ScopeSelector {
    fn from(list: Vec<String>) -> Self {
        ScopeSelector::Many(list)
    }
}

impl<'de> Deserialize<'de> for ScopeSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => ScopeSelector::Single(s),
            Value::Array(items) => ScopeSelector::Many(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => ScopeSelector::Absent,
        })
    }
}

impl RawStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = Some(color.into());
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn font_style(mut self, tokens: impl Into<String>) -> Self {
        self.font_style = Some(tokens.into());
        self
    }
}

impl RawThemeSetting {
    pub fn new(scope: impl Into<ScopeSelector>, style: RawStyle) -> Self {
        Self {
            name: None,
            scope: scope.into(),
            settings: Some(style),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The rule's label: entry-level name first, then the payload's.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.settings.as_ref().and_then(|s| s.name.as_deref()))
    }
}

impl RawTheme {
    /// Creates an empty, unnamed theme.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Appends a TextMate-style rule to `settings`.
    pub fn setting(mut self, scope: impl Into<ScopeSelector>, style: RawStyle) -> Self {
        self.settings
            .get_or_insert_with(Vec::new)
            .push(RawThemeSetting::new(scope, style));
        self
    }

    /// Appends a VS Code-style rule to `tokenColors`.
    pub fn token_color(mut self, scope: impl Into<ScopeSelector>, style: RawStyle) -> Self {
        self.token_colors
            .get_or_insert_with(Vec::new)
            .push(RawThemeSetting::new(scope, style));
        self
    }

    /// Parses a theme from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ThemeError::parse(None, e))
    }

    /// Parses a theme from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| ThemeError::parse(None, e))
    }

    /// Reads and parses a theme file, choosing the format by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = ThemeFormat::from_path(path).ok_or_else(|| {
            ThemeError::UnsupportedExtension {
                path: path.to_path_buf(),
            }
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = match format {
            ThemeFormat::Json => Self::from_json(&text),
            ThemeFormat::Yaml => Self::from_yaml(&text),
        };
        parsed.map_err(|err| match err {
            ThemeError::Parse { message, .. } => ThemeError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeFormat {
    Json,
    Yaml,
}

impl ThemeFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ThemeFormat::Json),
            "yaml" | "yml" => Some(ThemeFormat::Yaml),
            _ => None,
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_style<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<RawStyle>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// VS Code themes may point `tokenColors` at a separate file by path; that
// form (and any other non-list) reads as no rules.
fn lenient_settings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<RawThemeSetting>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}
