//! The scope trie: matching scope names against theme rules.
//!
//! Rules are stored at the node reached by walking their scope one dotted
//! segment at a time, so `string.quoted` lives under `string`. Each node can
//! hold several rules that differ only in their parent-scope constraint.
//!
//! # Inheritance
//!
//! A rule that leaves a channel unset takes it from the rule it refines: the
//! nearest unconstrained rule at its own node or an ancestor node, and
//! failing that the trie's fallback style (the theme defaults). Inheritance
//! is resolved at insert time, so callers must insert shorter scopes before
//! longer ones; sorted rule order guarantees that.
//!
//! # Matching
//!
//! Lookup walks greedily: `string.quoted.double` follows `string` then
//! `quoted` and stops at the first segment without a child. The rules of
//! every node on that path are returned, deepest node first.
//!
//! ```rust
//! use standout_scopes::{ColorMap, FontStyle, ScopeStyle, ScopeTrie};
//!
//! let mut colors = ColorMap::new();
//! let defaults = ScopeStyle {
//!     font_style: FontStyle::NONE,
//!     foreground: colors.intern("#000000"),
//!     background: colors.intern("#ffffff"),
//! };
//! let mut trie = ScopeTrie::new(defaults);
//! trie.insert(None, "string", None, Some(FontStyle::ITALIC), 0, 0);
//! trie.insert(None, "string.quoted", None, None, colors.intern("#ce9178"), 0);
//!
//! let rules = trie.match_scope("string.quoted.double");
//! assert_eq!(rules[0].scope_depth, 2);
//! assert_eq!(rules[0].font_style, FontStyle::ITALIC);
//! assert_eq!(rules[1].scope_depth, 1);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::color::{ColorId, ColorMap};
use crate::font_style::FontStyle;

/// A fully resolved style: every channel has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeStyle {
    pub font_style: FontStyle,
    pub foreground: ColorId,
    pub background: ColorId,
}

/// A rule as stored in the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieRule {
    /// Number of scope segments consumed to reach this rule.
    pub scope_depth: usize,
    /// Ancestor constraint, nearest ancestor first.
    pub parent_scopes: Option<Vec<String>>,
    pub font_style: FontStyle,
    pub foreground: ColorId,
    pub background: ColorId,
}

impl TrieRule {
    pub fn style(&self) -> ScopeStyle {
        ScopeStyle {
            font_style: self.font_style,
            foreground: self.foreground,
            background: self.background,
        }
    }

    /// Checks the parent-scope constraint against the enclosing scopes.
    ///
    /// `ancestors` is ordered outermost first. Each parent selector must be
    /// found, in order, walking outward from the innermost ancestor; a
    /// selector matches a scope equal to it or nested under it
    /// (`source` matches `source.js`, not `sourcemap`).
    pub fn matches_ancestors<S: AsRef<str>>(&self, ancestors: &[S]) -> bool {
        let Some(parents) = &self.parent_scopes else {
            return true;
        };
        let mut wanted = parents.iter().peekable();
        for scope in ancestors.iter().rev() {
            match wanted.peek() {
                Some(selector) if scope_has_prefix(scope.as_ref(), selector) => {
                    wanted.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        wanted.peek().is_none()
    }

    fn accept_overwrite(
        &mut self,
        font_style: Option<FontStyle>,
        foreground: ColorId,
        background: ColorId,
    ) {
        if let Some(font_style) = font_style {
            self.font_style = font_style;
        }
        if foreground != ColorMap::UNSET {
            self.foreground = foreground;
        }
        if background != ColorMap::UNSET {
            self.background = background;
        }
    }
}

fn scope_has_prefix(scope: &str, selector: &str) -> bool {
    match scope.strip_prefix(selector) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Orders rules most specific first: deeper scopes, then longer parent
/// chains, then longer parent selectors. Unconstrained rules sort last.
fn cmp_by_specificity(a: &TrieRule, b: &TrieRule) -> Ordering {
    b.scope_depth
        .cmp(&a.scope_depth)
        .then_with(|| match (&a.parent_scopes, &b.parent_scopes) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => b.len().cmp(&a.len()).then_with(|| {
                a.iter()
                    .zip(b)
                    .map(|(a, b)| b.len().cmp(&a.len()))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            }),
        })
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    rules: Vec<TrieRule>,
}

impl TrieNode {
    fn unconstrained(&self) -> Option<&TrieRule> {
        self.rules.iter().find(|rule| rule.parent_scopes.is_none())
    }

    fn insert_here(
        &mut self,
        scope_depth: usize,
        parent_scopes: Option<Vec<String>>,
        font_style: Option<FontStyle>,
        foreground: ColorId,
        background: ColorId,
        inherited: ScopeStyle,
    ) {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|rule| rule.parent_scopes == parent_scopes)
        {
            existing.accept_overwrite(font_style, foreground, background);
            return;
        }

        let mut rule = TrieRule {
            scope_depth,
            parent_scopes,
            font_style: inherited.font_style,
            foreground: inherited.foreground,
            background: inherited.background,
        };
        rule.accept_overwrite(font_style, foreground, background);
        self.rules.push(rule);
        self.rules.sort_by(cmp_by_specificity);
    }

    fn rule_count(&self) -> usize {
        self.rules.len() + self.children.values().map(TrieNode::rule_count).sum::<usize>()
    }
}

/// Trie of theme rules keyed by dotted scope segments.
#[derive(Debug, Clone)]
pub struct ScopeTrie {
    root: TrieNode,
    fallback: ScopeStyle,
}

impl ScopeTrie {
    /// Creates an empty trie whose rules inherit from `fallback`.
    pub fn new(fallback: ScopeStyle) -> Self {
        Self {
            root: TrieNode::default(),
            fallback,
        }
    }

    /// Inserts a rule for `scope`.
    ///
    /// A rule with the same parent-scope constraint already present at the
    /// node is updated in place: only the channels set here overwrite it.
    /// `name` is a label for diagnostics and is not stored.
    pub fn insert(
        &mut self,
        name: Option<&str>,
        scope: &str,
        parent_scopes: Option<Vec<String>>,
        font_style: Option<FontStyle>,
        foreground: ColorId,
        background: ColorId,
    ) {
        tracing::trace!(rule = name, scope, ?parent_scopes, "inserting theme rule");

        let mut inherited = self.root.unconstrained().map_or(self.fallback, TrieRule::style);
        let mut node = &mut self.root;
        let mut depth = 0;
        for segment in segments(scope) {
            node = node.children.entry(segment.to_string()).or_default();
            depth += 1;
            if let Some(rule) = node.unconstrained() {
                inherited = rule.style();
            }
        }
        node.insert_here(depth, parent_scopes, font_style, foreground, background, inherited);
    }

    /// Returns the rules applicable to `scope`, most specific first.
    pub fn match_scope(&self, scope: &str) -> Vec<TrieRule> {
        let mut path = vec![&self.root];
        let mut node = &self.root;
        for segment in segments(scope) {
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    path.push(child);
                }
                None => break,
            }
        }
        path.iter()
            .rev()
            .flat_map(|node| node.rules.iter().cloned())
            .collect()
    }

    /// The style rules inherit from when nothing more specific is set.
    pub fn fallback(&self) -> ScopeStyle {
        self.fallback
    }

    /// Total number of stored rules.
    pub fn rule_count(&self) -> usize {
        self.root.rule_count()
    }
}

fn segments(scope: &str) -> impl Iterator<Item = &str> {
    (!scope.is_empty())
        .then(|| scope.split('.'))
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: ColorId = 1;
    const WHITE: ColorId = 2;
    const RED: ColorId = 3;
    const GREEN: ColorId = 4;

    fn trie() -> ScopeTrie {
        ScopeTrie::new(ScopeStyle {
            font_style: FontStyle::NONE,
            foreground: BLACK,
            background: WHITE,
        })
    }

    fn parents(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn longer_path_matches_first() {
        let mut t = trie();
        t.insert(None, "a", None, None, RED, 0);
        t.insert(None, "a.b", None, None, GREEN, 0);

        let rules = t.match_scope("a.b.c");
        assert_eq!(rules.len(), 2);
        assert_eq!((rules[0].scope_depth, rules[0].foreground), (2, GREEN));
        assert_eq!((rules[1].scope_depth, rules[1].foreground), (1, RED));

        let rules = t.match_scope("a");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].foreground, RED);
    }

    #[test]
    fn walk_stops_at_first_missing_segment() {
        let mut t = trie();
        t.insert(None, "a.b", None, None, RED, 0);

        assert!(t.match_scope("x.a.b").is_empty());
        assert!(t.match_scope("a.c.b").is_empty());
        assert_eq!(t.match_scope("a.b.x")[0].foreground, RED);
    }

    #[test]
    fn unset_channels_inherit_from_fallback() {
        let mut t = trie();
        t.insert(None, "comment", None, Some(FontStyle::ITALIC), 0, 0);

        let rule = &t.match_scope("comment")[0];
        assert_eq!(rule.font_style, FontStyle::ITALIC);
        assert_eq!(rule.foreground, BLACK);
        assert_eq!(rule.background, WHITE);
    }

    #[test]
    fn unset_channels_inherit_from_shorter_scope() {
        let mut t = trie();
        t.insert(None, "string", None, Some(FontStyle::BOLD), RED, 0);
        t.insert(None, "string.quoted", None, None, GREEN, 0);

        let rule = &t.match_scope("string.quoted")[0];
        assert_eq!(rule.font_style, FontStyle::BOLD);
        assert_eq!(rule.foreground, GREEN);
        assert_eq!(rule.background, WHITE);
    }

    #[test]
    fn explicit_none_font_style_clears_inherited() {
        let mut t = trie();
        t.insert(None, "markup", None, Some(FontStyle::BOLD), 0, 0);
        t.insert(None, "markup.raw", None, Some(FontStyle::NONE), 0, 0);

        assert_eq!(t.match_scope("markup.raw")[0].font_style, FontStyle::NONE);
    }

    #[test]
    fn same_constraint_overwrites_in_place() {
        let mut t = trie();
        t.insert(None, "keyword", None, Some(FontStyle::BOLD), RED, 0);
        t.insert(None, "keyword", None, None, GREEN, 0);

        let rules = t.match_scope("keyword");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].font_style, FontStyle::BOLD);
        assert_eq!(rules[0].foreground, GREEN);
        assert_eq!(t.rule_count(), 1);
    }

    #[test]
    fn constrained_rules_rank_before_unconstrained() {
        let mut t = trie();
        t.insert(None, "string.quoted", None, None, RED, 0);
        t.insert(None, "string.quoted", parents(&["source.js"]), None, GREEN, 0);

        let rules = t.match_scope("string.quoted");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].parent_scopes, parents(&["source.js"]));
        assert_eq!(rules[0].foreground, GREEN);
        assert_eq!(rules[1].parent_scopes, None);
    }

    #[test]
    fn constrained_rule_inherits_node_rule() {
        let mut t = trie();
        t.insert(None, "variable", None, Some(FontStyle::ITALIC), RED, 0);
        t.insert(None, "variable", parents(&["meta.function"]), None, GREEN, 0);

        let rules = t.match_scope("variable");
        assert_eq!(rules[0].foreground, GREEN);
        assert_eq!(rules[0].font_style, FontStyle::ITALIC);
    }

    #[test]
    fn longer_parent_chains_rank_first() {
        let mut t = trie();
        t.insert(None, "x", parents(&["a"]), None, RED, 0);
        t.insert(None, "x", parents(&["a", "b"]), None, GREEN, 0);
        t.insert(None, "x", parents(&["abc"]), None, BLACK, 0);

        let order: Vec<_> = t
            .match_scope("x")
            .into_iter()
            .map(|r| r.parent_scopes.unwrap())
            .collect();
        assert_eq!(
            order,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["abc".to_string()],
                vec!["a".to_string()],
            ]
        );
    }

    #[test]
    fn empty_scope_has_no_rules_by_default() {
        let mut t = trie();
        t.insert(None, "a", None, None, RED, 0);
        assert!(t.match_scope("").is_empty());
        assert!(t.match_scope("b").is_empty());
    }

    #[test]
    fn matches_ancestors_walks_outward_in_order() {
        let rule = TrieRule {
            scope_depth: 1,
            parent_scopes: parents(&["meta.function", "source"]),
            font_style: FontStyle::NONE,
            foreground: RED,
            background: WHITE,
        };

        assert!(rule.matches_ancestors(&["source.js", "meta.function.js"]));
        assert!(rule.matches_ancestors(&["source.js", "meta.class", "meta.function", "meta.block"]));
        assert!(!rule.matches_ancestors(&["meta.function", "source.js"]));
        assert!(!rule.matches_ancestors(&["sourcemap", "meta.function"]));
        assert!(!rule.matches_ancestors::<&str>(&[]));
    }

    #[test]
    fn unconstrained_rule_matches_any_ancestors() {
        let rule = TrieRule {
            scope_depth: 1,
            parent_scopes: None,
            font_style: FontStyle::NONE,
            foreground: RED,
            background: WHITE,
        };
        assert!(rule.matches_ancestors::<&str>(&[]));
        assert!(rule.matches_ancestors(&["source.rust"]));
    }
}
