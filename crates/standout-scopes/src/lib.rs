//! Scopes - TextMate-style theme resolution for syntax highlighting.
//!
//! A tokenizer labels every span of text with a stack of *scopes*
//! (`source.js`, `string.quoted.double.js`, ...). A theme is an ordered list
//! of rules keyed by scope selectors. This crate turns such a theme into a
//! [`ThemeIndex`] that answers "which style applies to this scope stack?"
//! quickly and repeatably.
//!
//! # Quick Start
//!
//! ```rust
//! use standout_scopes::{FontStyle, NoIncludes, RawTheme, ThemeIndex};
//!
//! let raw = RawTheme::from_json(r##"{
//!     "name": "Example",
//!     "tokenColors": [
//!         { "settings": { "foreground": "#F0F0F0", "background": "#1E1E1E" } },
//!         { "scope": "comment", "settings": { "foreground": "#608B4E", "fontStyle": "italic" } },
//!         { "scope": "source.js string", "settings": { "foreground": "#CE9178" } }
//!     ]
//! }"##).unwrap();
//!
//! let index = ThemeIndex::new(&raw, &NoIncludes);
//!
//! let comment = index.resolve_style(&["source.js", "comment.line"]);
//! assert_eq!(index.color(comment.foreground), Some("#608B4E"));
//! assert!(comment.font_style.contains(FontStyle::ITALIC));
//!
//! let string = index.resolve_style(&["source.js", "string.quoted"]);
//! assert_eq!(index.color(string.foreground), Some("#CE9178"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RawTheme --parse--> [ParsedRule] --sort/defaults--> ScopeTrie --+
//!    |                                                            +--> ThemeIndex
//!    +--include--> RawTheme --parse--> ... ---------> ScopeTrie --+
//! ```
//!
//! - [`parse_theme`]: flattens entries into [`ParsedRule`]s. Lenient: bad
//!   colors and selectors degrade instead of failing.
//! - [`resolve_rules`]: sorts rules, folds empty-scope rules into defaults,
//!   and builds a [`ScopeTrie`].
//! - [`ThemeIndex`]: owns the theme's trie, the included theme's trie, the
//!   shared [`ColorMap`], and a per-scope match cache.
//!
//! # Precedence
//!
//! | Situation | Winner |
//! |-----------|--------|
//! | Longer matched scope path | `string.quoted` over `string` |
//! | Same scope, parent constraint | constrained over unconstrained |
//! | Same scope and constraint | later declaration, per channel |
//! | Theme vs included theme | theme |
//!
//! # Loading
//!
//! [`RawTheme::from_json`], [`RawTheme::from_yaml`] and
//! [`RawTheme::from_path`] read theme documents. [`ThemeRegistry`] collects
//! named themes and resolves `include` references.

mod color;
mod error;
mod font_style;
mod include;
mod index;
mod parse;
mod raw;
mod registry;
mod resolve;
mod trie;

// Re-export public API
pub use color::{is_valid_hex_color, ColorId, ColorMap};
pub use error::{Result, ThemeError};
pub use font_style::FontStyle;
pub use include::{parse_include, NoIncludes, ThemeLookup, INCLUDE_PRIORITY, THEME_PRIORITY};
pub use index::ThemeIndex;
pub use parse::{parse_settings, parse_theme, ParsedRule};
pub use raw::{RawStyle, RawTheme, RawThemeSetting, ScopeSelector, THEME_EXTENSIONS};
pub use registry::ThemeRegistry;
pub use resolve::{
    compare_rules, resolve_rules, ResolvedRules, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND,
};
pub use trie::{ScopeStyle, ScopeTrie, TrieRule};
