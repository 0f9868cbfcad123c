//! Following a theme's `include` reference.
//!
//! Includes are resolved one level deep: the included theme's own `include`
//! is ignored. Its rules form a separate rule set that is matched after the
//! including theme's rules.

use std::collections::HashMap;

use crate::parse::{parse_theme, ParsedRule};
use crate::raw::RawTheme;

/// Priority band for a theme's own rules.
pub const THEME_PRIORITY: usize = 0;

/// Priority band for included rules; keeps their indexes clear of the
/// including theme's.
pub const INCLUDE_PRIORITY: usize = 1 << 20;

/// Resolves include references to theme documents.
///
/// A missing theme is not an error; resolution simply carries no include
/// rules.
pub trait ThemeLookup {
    fn lookup(&self, reference: &str) -> Option<RawTheme>;
}

/// A lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl ThemeLookup for NoIncludes {
    fn lookup(&self, _reference: &str) -> Option<RawTheme> {
        None
    }
}

impl ThemeLookup for HashMap<String, RawTheme> {
    fn lookup(&self, reference: &str) -> Option<RawTheme> {
        self.get(reference).cloned()
    }
}

impl<L: ThemeLookup + ?Sized> ThemeLookup for &L {
    fn lookup(&self, reference: &str) -> Option<RawTheme> {
        (**self).lookup(reference)
    }
}

/// Parses the rules of the theme `theme` includes, if any.
pub fn parse_include<L: ThemeLookup + ?Sized>(
    theme: &RawTheme,
    lookup: &L,
    priority: usize,
) -> Vec<ParsedRule> {
    let Some(reference) = theme.include.as_deref().filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    match lookup.lookup(reference) {
        Some(included) => {
            tracing::debug!(include = reference, "resolved theme include");
            parse_theme(&included, priority)
        }
        None => {
            tracing::debug!(include = reference, "theme include not found");
            Vec::new()
        }
    }
}
