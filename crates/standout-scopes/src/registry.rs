//! Named collection of raw themes, usable as an include lookup.
//!
//! # Sources
//!
//! - Inline themes added with [`ThemeRegistry::add_inline`] (highest priority)
//! - Theme files, added one at a time or by scanning a directory
//!
//! Files register under their file stem: `themes/dark_vs.json` is `dark_vs`.
//! When a directory holds the same stem with several extensions, the
//! extension listed first in [`THEME_EXTENSIONS`] wins. Across directories
//! the first registration of a name wins.
//!
//! # Include references
//!
//! VS Code themes name their parent by relative path (`"./dark_vs.json"`).
//! [`ThemeLookup::lookup`] strips a leading `./`, tries the reference as a
//! name, then falls back to its file stem.
//!
//! # Example
//!
//! ```rust,ignore
//! use standout_scopes::{ThemeIndex, ThemeRegistry};
//!
//! let mut registry = ThemeRegistry::new();
//! registry.add_dir("./themes")?;
//!
//! let theme = registry.get("dark_plus")?;
//! let index = ThemeIndex::new(theme, &registry);
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, ThemeError};
use crate::include::ThemeLookup;
use crate::raw::{RawTheme, THEME_EXTENSIONS};

/// Registry of raw themes by name.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    inline: HashMap<String, RawTheme>,
    files: HashMap<String, RawTheme>,
}

impl ThemeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pre-built theme. Inline themes shadow file themes.
    pub fn add_inline(&mut self, name: impl Into<String>, theme: RawTheme) {
        self.inline.insert(name.into(), theme);
    }

    /// Parses JSON text and adds it as an inline theme.
    pub fn add_json(&mut self, name: impl Into<String>, json: &str) -> Result<()> {
        let theme = RawTheme::from_json(json)?;
        self.add_inline(name, theme);
        Ok(())
    }

    /// Parses YAML text and adds it as an inline theme.
    pub fn add_yaml(&mut self, name: impl Into<String>, yaml: &str) -> Result<()> {
        let theme = RawTheme::from_yaml(yaml)?;
        self.add_inline(name, theme);
        Ok(())
    }

    /// Reads a single theme file and registers it under its file stem.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, has an unsupported extension, or
    /// does not parse.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let theme = RawTheme::from_path(path)?;
        let name = file_stem(path);
        self.files.entry(name).or_insert(theme);
        Ok(())
    }

    /// Registers every theme file directly inside `dir`.
    ///
    /// Files with other extensions are ignored. A theme file that cannot be
    /// read or parsed is skipped with a warning, so one broken theme does not
    /// hide the rest.
    ///
    /// # Errors
    ///
    /// Fails only if the directory itself cannot be read.
    pub fn add_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        let io_error = |source: std::io::Error| ThemeError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if let Some(priority) = extension_priority(&path) {
                candidates.push((file_stem(&path), priority, path));
            }
        }
        candidates.sort();

        let mut seen = Vec::new();
        for (name, _, path) in candidates {
            if seen.contains(&name) {
                continue;
            }
            match RawTheme::from_path(&path) {
                Ok(theme) => {
                    seen.push(name.clone());
                    self.files.entry(name).or_insert(theme);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping theme file");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), themes = seen.len(), "loaded theme directory");
        Ok(())
    }

    /// Returns the theme registered as `name`.
    pub fn get(&self, name: &str) -> Result<&RawTheme> {
        self.inline
            .get(name)
            .or_else(|| self.files.get(name))
            .ok_or_else(|| ThemeError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inline.contains_key(name) || self.files.contains_key(name)
    }

    /// Registered names, inline first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inline.keys().chain(
            self.files
                .keys()
                .filter(|name| !self.inline.contains_key(*name)),
        )
        .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.files.is_empty()
    }

    fn resolve(&self, reference: &str) -> Option<&RawTheme> {
        let reference = reference.strip_prefix("./").unwrap_or(reference);
        self.get(reference)
            .ok()
            .or_else(|| self.get(&file_stem(Path::new(reference))).ok())
    }
}

impl ThemeLookup for ThemeRegistry {
    fn lookup(&self, reference: &str) -> Option<RawTheme> {
        self.resolve(reference).cloned()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_priority(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    THEME_EXTENSIONS.iter().position(|ext| name.ends_with(ext))
}
