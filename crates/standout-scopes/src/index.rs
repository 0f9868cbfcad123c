//! The resolved, queryable theme.
//!
//! A [`ThemeIndex`] holds two tries built from one theme document: one for
//! the theme's own rules and one for the theme it includes. Both intern
//! their colors into a single [`ColorMap`], so ids from either trie compare
//! directly.
//!
//! # Scope stacks
//!
//! Stacks are passed outermost first, the order a tokenizer pushes them:
//! `["source.js", "meta.function.js", "string.quoted.double.js"]`.
//!
//! # Caching
//!
//! Trie lookups are memoized per scope name. The cache sits behind one
//! `RwLock`, so a resolved index can be shared across threads; entries are
//! computed once and never change.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::color::{ColorId, ColorMap};
use crate::include::{parse_include, ThemeLookup, INCLUDE_PRIORITY, THEME_PRIORITY};
use crate::parse::parse_theme;
use crate::raw::RawTheme;
use crate::resolve::resolve_rules;
use crate::trie::{ScopeStyle, ScopeTrie, TrieRule};

type MatchCache = RwLock<HashMap<String, Arc<[TrieRule]>>>;

/// One rule set with its memoized lookups.
#[derive(Debug)]
struct ParsedTheme {
    trie: ScopeTrie,
    cache: MatchCache,
}

impl ParsedTheme {
    fn new(trie: ScopeTrie) -> Self {
        Self {
            trie,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn match_scope(&self, scope: &str) -> Arc<[TrieRule]> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
            .cloned();
        if let Some(rules) = cached {
            return rules;
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(scope.to_string())
            .or_insert_with(|| {
                let rules: Arc<[TrieRule]> = self.trie.match_scope(scope).into();
                tracing::trace!(scope, candidates = rules.len(), "scope match cache miss");
                rules
            })
            .clone()
    }
}

/// A theme resolved into scope tries, ready for matching.
///
/// # Example
///
/// ```rust
/// use standout_scopes::{NoIncludes, RawStyle, RawTheme, ThemeIndex};
///
/// let raw = RawTheme::new()
///     .setting("", RawStyle::new().foreground("#D4D4D4").background("#1E1E1E"))
///     .setting("comment", RawStyle::new().foreground("#6A9955").font_style("italic"));
///
/// let index = ThemeIndex::new(&raw, &NoIncludes);
///
/// let style = index.resolve_style(&["source.rust", "comment.line.double-slash"]);
/// assert_eq!(index.color(style.foreground), Some("#6A9955"));
/// assert_eq!(index.color(index.defaults().background), Some("#1E1E1E"));
/// ```
#[derive(Debug)]
pub struct ThemeIndex {
    name: Option<String>,
    colors: ColorMap,
    theme: ParsedTheme,
    include: ParsedTheme,
}

impl ThemeIndex {
    /// Resolves `raw`, following its include reference through `lookup`.
    pub fn new<L: ThemeLookup + ?Sized>(raw: &RawTheme, lookup: &L) -> Self {
        let mut colors = ColorMap::new();

        let own = resolve_rules(parse_theme(raw, THEME_PRIORITY), &mut colors, None);
        let included = resolve_rules(
            parse_include(raw, lookup, INCLUDE_PRIORITY),
            &mut colors,
            Some(own.defaults),
        );

        tracing::debug!(
            theme = raw.name.as_deref(),
            rules = own.trie.rule_count(),
            include_rules = included.trie.rule_count(),
            colors = colors.len(),
            "resolved theme"
        );

        Self {
            name: raw.name.clone(),
            colors,
            theme: ParsedTheme::new(own.trie),
            include: ParsedTheme::new(included.trie),
        }
    }

    /// The theme's declared name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns every candidate rule for the stack.
    ///
    /// The theme's own rules come first, then the included theme's. Within
    /// each, the innermost scope's candidates come first, each group ordered
    /// most specific first. Parent-scope constraints are not checked here;
    /// see [`TrieRule::matches_ancestors`] and [`resolve_style`](Self::resolve_style).
    pub fn match_scopes<S: AsRef<str>>(&self, scope_stack: &[S]) -> Vec<TrieRule> {
        let mut result = Vec::new();
        for parsed in [&self.theme, &self.include] {
            for scope in scope_stack.iter().rev() {
                result.extend(parsed.match_scope(scope.as_ref()).iter().cloned());
            }
        }
        result
    }

    /// The style a renderer applies to text with this scope stack.
    ///
    /// Takes the first candidate, in [`match_scopes`](Self::match_scopes)
    /// order, whose parent-scope constraint holds for the scopes enclosing
    /// the one it matched. Falls back to [`defaults`](Self::defaults).
    pub fn resolve_style<S: AsRef<str>>(&self, scope_stack: &[S]) -> ScopeStyle {
        for parsed in [&self.theme, &self.include] {
            for depth in (0..scope_stack.len()).rev() {
                let ancestors = &scope_stack[..depth];
                let candidates = parsed.match_scope(scope_stack[depth].as_ref());
                if let Some(rule) = candidates
                    .iter()
                    .find(|rule| rule.matches_ancestors(ancestors))
                {
                    return rule.style();
                }
            }
        }
        self.defaults()
    }

    /// The theme's own defaults.
    ///
    /// Defaults declared by an included theme are not merged in; included
    /// rules inherit these instead.
    pub fn defaults(&self) -> ScopeStyle {
        self.theme.trie.fallback()
    }

    /// Snapshot of the color table; index is the color id, slot 0 is unset.
    pub fn color_map(&self) -> Vec<Option<String>> {
        self.colors.snapshot()
    }

    /// The id of a color used by this theme.
    ///
    /// A color the theme never uses is `None`, not [`ColorMap::UNSET`]; the
    /// lookup never allocates an id.
    pub fn color_id(&self, color: &str) -> Option<ColorId> {
        self.colors.id(color)
    }

    /// The normalized color string for `id`.
    pub fn color(&self, id: ColorId) -> Option<&str> {
        self.colors.color(id)
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }
}
