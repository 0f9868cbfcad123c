//! Font style flags.
//!
//! A rule's font style is tri-state: `None` (the rule does not say), or
//! `Some(flags)` where `flags` may be [`FontStyle::NONE`] to explicitly clear
//! inherited styling. Collapsing the two would make an explicit
//! `fontStyle: ""` indistinguishable from a rule that never mentioned it.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Bitmask of font style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u8 {
        const ITALIC        = 1 << 0;
        const BOLD          = 1 << 1;
        const UNDERLINE     = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
    }
}

impl FontStyle {
    /// No flags; an explicit "plain" style.
    pub const NONE: FontStyle = FontStyle::empty();

    const NAMED: [(FontStyle, &'static str); 4] = [
        (FontStyle::ITALIC, "italic"),
        (FontStyle::BOLD, "bold"),
        (FontStyle::UNDERLINE, "underline"),
        (FontStyle::STRIKETHROUGH, "strikethrough"),
    ];

    /// Parses a space-separated token list such as `"bold italic"`.
    ///
    /// Unknown tokens are ignored; a string with no known token yields
    /// [`FontStyle::NONE`].
    pub fn parse(tokens: &str) -> Self {
        tokens
            .split(' ')
            .filter_map(Self::from_token)
            .collect()
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(_, name)| *name == token)
            .map(|(style, _)| *style)
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(style, _)| self.contains(*style))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_tokens() {
        assert_eq!(FontStyle::parse("italic"), FontStyle::ITALIC);
        assert_eq!(FontStyle::parse("bold"), FontStyle::BOLD);
        assert_eq!(FontStyle::parse("underline"), FontStyle::UNDERLINE);
        assert_eq!(FontStyle::parse("strikethrough"), FontStyle::STRIKETHROUGH);
    }

    #[test]
    fn parse_combines_tokens() {
        let style = FontStyle::parse("bold italic");
        assert!(style.contains(FontStyle::BOLD));
        assert!(style.contains(FontStyle::ITALIC));
        assert!(!style.contains(FontStyle::UNDERLINE));
    }

    #[test]
    fn parse_ignores_unknown_tokens() {
        assert_eq!(FontStyle::parse("bold wavy"), FontStyle::BOLD);
        assert_eq!(FontStyle::parse("Bold"), FontStyle::NONE);
    }

    #[test]
    fn empty_string_is_explicit_none() {
        assert_eq!(FontStyle::parse(""), FontStyle::NONE);
        assert!(FontStyle::parse("  ").is_empty());
    }

    #[test]
    fn display_lists_tokens_in_fixed_order() {
        let style = FontStyle::UNDERLINE | FontStyle::ITALIC;
        assert_eq!(style.to_string(), "italic underline");
        assert_eq!(FontStyle::NONE.to_string(), "");
    }

    #[test]
    fn none_is_the_empty_mask() {
        assert_eq!(FontStyle::NONE, FontStyle::empty());
        assert_eq!(FontStyle::default(), FontStyle::NONE);
        assert_eq!((FontStyle::BOLD | FontStyle::ITALIC).bits(), 0b11);
    }
}
