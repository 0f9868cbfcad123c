//! Flattening raw theme entries into normalized rules.
//!
//! Every (entry, selector) pair becomes one [`ParsedRule`]. Nothing here
//! fails: unknown font style tokens are dropped, colors that are not hex
//! strings become unset, and a missing selector targets the theme defaults.

use crate::color::is_valid_hex_color;
use crate::font_style::FontStyle;
use crate::raw::{RawTheme, RawThemeSetting};

/// A normalized theme rule, ready to be sorted and inserted into a trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    /// Human label; never matched on.
    pub name: Option<String>,
    /// Innermost scope; empty for theme defaults.
    pub scope: String,
    /// Ancestor constraint, nearest ancestor first.
    pub parent_scopes: Option<Vec<String>>,
    /// Declaration position plus the priority band.
    pub index: usize,
    /// `None` when the entry did not mention a font style.
    pub font_style: Option<FontStyle>,
    pub foreground: Option<String>,
    pub background: Option<String>,
}

/// Parses both rule lists of a theme document.
///
/// `settings` is read before `tokenColors`; each list numbers its entries
/// from zero, offset by `priority`.
pub fn parse_theme(theme: &RawTheme, priority: usize) -> Vec<ParsedRule> {
    let mut rules = Vec::new();
    for list in [&theme.settings, &theme.token_colors].into_iter().flatten() {
        parse_settings(list, priority, &mut rules);
    }
    rules
}

/// Appends the rules produced by `settings` to `out`.
pub fn parse_settings(settings: &[RawThemeSetting], priority: usize, out: &mut Vec<ParsedRule>) {
    let entries = settings
        .iter()
        .filter_map(|entry| entry.settings.as_ref().map(|style| (entry, style)));

    for (position, (entry, style)) in entries.enumerate() {
        let font_style = style.font_style.as_deref().map(FontStyle::parse);
        let foreground = valid_color(style.foreground.as_deref());
        let background = valid_color(style.background.as_deref());

        for selector in entry.scope.selectors() {
            let (scope, parent_scopes) = split_selector(&selector);
            out.push(ParsedRule {
                name: entry.label().map(str::to_string),
                scope,
                parent_scopes,
                index: position + priority,
                font_style,
                foreground: foreground.clone(),
                background: background.clone(),
            });
        }
    }
}

/// Splits `"source.js string.quoted"` into the innermost scope and its
/// reversed ancestor chain.
fn split_selector(selector: &str) -> (String, Option<Vec<String>>) {
    let mut segments: Vec<String> = selector.split_whitespace().map(str::to_string).collect();
    let scope = segments.pop().unwrap_or_default();
    if segments.is_empty() {
        return (scope, None);
    }
    segments.reverse();
    (scope, Some(segments))
}

fn valid_color(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| is_valid_hex_color(v))
        .map(str::to_string)
}
