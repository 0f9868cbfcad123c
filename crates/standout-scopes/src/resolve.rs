//! Rule ordering, defaults extraction, and trie construction.
//!
//! Parsed rules are sorted by `(scope, parent_scopes, index)`. The order
//! carries two guarantees the trie relies on:
//!
//! - A scope sorts before every scope it prefixes, so a rule is inserted
//!   after the rules it inherits from.
//! - Rules with the same scope and constraint are adjacent and ascend by
//!   declaration order, so the later declaration overwrites the earlier one.
//!
//! Empty-scope rules sort first. They are folded into the theme defaults
//! instead of being inserted.

use std::cmp::Ordering;

use crate::color::ColorMap;
use crate::font_style::FontStyle;
use crate::parse::ParsedRule;
use crate::trie::{ScopeStyle, ScopeTrie};

/// Foreground used when a theme declares no default foreground.
pub const DEFAULT_FOREGROUND: &str = "#000000";
/// Background used when a theme declares no default background.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// The outcome of resolving one rule set.
#[derive(Debug, Clone)]
pub struct ResolvedRules {
    pub defaults: ScopeStyle,
    pub trie: ScopeTrie,
}

/// Compares two rules in canonical insertion order.
///
/// Parent chains compare as sequences: no chain sorts before any chain,
/// and a chain sorts before its own extensions.
pub fn compare_rules(a: &ParsedRule, b: &ParsedRule) -> Ordering {
    a.scope
        .cmp(&b.scope)
        .then_with(|| a.parent_scopes.cmp(&b.parent_scopes))
        .then_with(|| a.index.cmp(&b.index))
}

/// Resolves a flat rule list into defaults plus a populated trie.
///
/// Colors are interned into `colors`, which may be shared with other rule
/// sets so ids stay comparable. Trie rules inherit unset channels from
/// `inherited` when given, otherwise from the folded defaults; an included
/// theme passes the including theme's defaults here.
pub fn resolve_rules(
    mut rules: Vec<ParsedRule>,
    colors: &mut ColorMap,
    inherited: Option<ScopeStyle>,
) -> ResolvedRules {
    rules.sort_by(compare_rules);

    let default_count = rules.iter().take_while(|rule| rule.scope.is_empty()).count();
    let defaults = fold_defaults(&rules[..default_count], colors);

    let mut trie = ScopeTrie::new(inherited.unwrap_or(defaults));
    for rule in &rules[default_count..] {
        let foreground = colors.intern_opt(rule.foreground.as_deref());
        let background = colors.intern_opt(rule.background.as_deref());
        trie.insert(
            rule.name.as_deref(),
            &rule.scope,
            rule.parent_scopes.clone(),
            rule.font_style,
            foreground,
            background,
        );
    }

    ResolvedRules { defaults, trie }
}

fn fold_defaults(rules: &[ParsedRule], colors: &mut ColorMap) -> ScopeStyle {
    let mut font_style = FontStyle::NONE;
    let mut foreground = DEFAULT_FOREGROUND;
    let mut background = DEFAULT_BACKGROUND;

    for rule in rules {
        if let Some(style) = rule.font_style {
            font_style = style;
        }
        if let Some(color) = rule.foreground.as_deref() {
            foreground = color;
        }
        if let Some(color) = rule.background.as_deref() {
            background = color;
        }
    }

    ScopeStyle {
        font_style,
        foreground: colors.intern(foreground),
        background: colors.intern(background),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(scope: &str, parents: &[&str], index: usize) -> ParsedRule {
        ParsedRule {
            name: None,
            scope: scope.to_string(),
            parent_scopes: (!parents.is_empty())
                .then(|| parents.iter().map(|s| s.to_string()).collect()),
            index,
            font_style: None,
            foreground: None,
            background: None,
        }
    }

    #[test]
    fn sort_by_scope_then_parents_then_index() {
        let mut rules = vec![
            rule("b", &[], 0),
            rule("a", &["y"], 1),
            rule("a", &["x", "z"], 2),
            rule("a", &["x"], 3),
            rule("a", &[], 5),
            rule("a", &[], 4),
            rule("", &[], 6),
        ];
        rules.sort_by(compare_rules);

        let keys: Vec<_> = rules.iter().map(|r| (r.scope.as_str(), r.index)).collect();
        assert_eq!(
            keys,
            vec![("", 6), ("a", 4), ("a", 5), ("a", 3), ("a", 2), ("a", 1), ("b", 0)]
        );
    }

    #[test]
    fn scope_sorts_before_its_extensions() {
        let a = rule("string", &[], 9);
        let b = rule("string.quoted", &[], 0);
        assert_eq!(compare_rules(&a, &b), Ordering::Less);
    }

    #[test]
    fn defaults_merge_field_by_field() {
        let mut bold = rule("", &[], 0);
        bold.font_style = Some(FontStyle::BOLD);
        let mut fg = rule("", &[], 1);
        fg.foreground = Some("#111111".into());

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![fg, bold], &mut colors, None);

        assert_eq!(resolved.defaults.font_style, FontStyle::BOLD);
        assert_eq!(colors.color(resolved.defaults.foreground), Some("#111111"));
        assert_eq!(colors.color(resolved.defaults.background), Some("#FFFFFF"));
        assert_eq!(resolved.trie.rule_count(), 0);
    }

    #[test]
    fn later_default_wins_per_channel() {
        let mut first = rule("", &[], 0);
        first.foreground = Some("#111111".into());
        first.font_style = Some(FontStyle::ITALIC);
        let mut second = rule("", &[], 1);
        second.foreground = Some("#222222".into());

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![second, first], &mut colors, None);

        assert_eq!(colors.color(resolved.defaults.foreground), Some("#222222"));
        assert_eq!(resolved.defaults.font_style, FontStyle::ITALIC);
    }

    #[test]
    fn no_default_rules_uses_black_on_white() {
        let mut colors = ColorMap::new();
        let resolved = resolve_rules(Vec::new(), &mut colors, None);

        assert_eq!(resolved.defaults.font_style, FontStyle::NONE);
        assert_eq!(colors.color(resolved.defaults.foreground), Some("#000000"));
        assert_eq!(colors.color(resolved.defaults.background), Some("#FFFFFF"));
    }

    #[test]
    fn later_declaration_overwrites_same_scope() {
        let mut early = rule("keyword", &[], 0);
        early.foreground = Some("#aa0000".into());
        early.font_style = Some(FontStyle::BOLD);
        let mut late = rule("keyword", &[], 1);
        late.foreground = Some("#00aa00".into());

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![late, early], &mut colors, None);

        let rules = resolved.trie.match_scope("keyword");
        assert_eq!(rules.len(), 1);
        assert_eq!(colors.color(rules[0].foreground), Some("#00AA00"));
        assert_eq!(rules[0].font_style, FontStyle::BOLD);
    }

    #[test]
    fn inserted_rules_inherit_resolved_defaults() {
        let mut default = rule("", &[], 0);
        default.background = Some("#1e1e1e".into());
        let comment = rule("comment", &[], 1);

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![comment, default], &mut colors, None);

        let matched = &resolved.trie.match_scope("comment")[0];
        assert_eq!(matched.background, resolved.defaults.background);
        assert_eq!(matched.foreground, resolved.defaults.foreground);
    }

    #[test]
    fn explicit_empty_font_style_clears_earlier_default() {
        let mut bold = rule("", &[], 0);
        bold.font_style = Some(FontStyle::BOLD);
        let mut cleared = rule("", &[], 1);
        cleared.font_style = Some(FontStyle::NONE);

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![cleared, bold], &mut colors, None);

        assert_eq!(resolved.defaults.font_style, FontStyle::NONE);
    }

    #[test]
    fn absent_font_style_keeps_earlier_default() {
        let mut bold = rule("", &[], 0);
        bold.font_style = Some(FontStyle::BOLD);
        let mut fg = rule("", &[], 1);
        fg.foreground = Some("#111111".into());

        let mut colors = ColorMap::new();
        let resolved = resolve_rules(vec![fg, bold], &mut colors, None);

        assert_eq!(resolved.defaults.font_style, FontStyle::BOLD);
        assert_eq!(colors.color(resolved.defaults.foreground), Some("#111111"));
    }

    #[test]
    fn inherited_style_replaces_folded_defaults_as_fallback() {
        let mut colors = ColorMap::new();
        let inherited = ScopeStyle {
            font_style: FontStyle::NONE,
            foreground: colors.intern("#D4D4D4"),
            background: colors.intern("#1E1E1E"),
        };
        let mut comment = rule("comment", &[], 0);
        comment.font_style = Some(FontStyle::ITALIC);

        let resolved = resolve_rules(vec![comment], &mut colors, Some(inherited));

        assert_eq!(resolved.trie.fallback(), inherited);
        let matched = &resolved.trie.match_scope("comment")[0];
        assert_eq!(matched.font_style, FontStyle::ITALIC);
        assert_eq!(matched.foreground, inherited.foreground);
        assert_eq!(matched.background, inherited.background);
        assert_eq!(colors.color(resolved.defaults.foreground), Some("#000000"));
    }
}
