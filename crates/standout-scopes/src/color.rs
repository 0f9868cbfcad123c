//! Hex color validation and the color interning table.
//!
//! Theme rules refer to colors by string (`"#ff6b35"`). Once a theme is
//! resolved every color is referenced by a small integer [`ColorId`] instead,
//! so that rules from the base theme and its include compare by identity.
//!
//! # Example
//!
//! ```rust
//! use standout_scopes::{is_valid_hex_color, ColorMap};
//!
//! assert!(is_valid_hex_color("#1e1e1e"));
//! assert!(!is_valid_hex_color("red"));
//!
//! let mut map = ColorMap::new();
//! let id = map.intern("#1e1e1e");
//! assert_eq!(map.color(id), Some("#1E1E1E"));
//! assert_eq!(map.id("#1E1E1E"), Some(id));
//! ```

use std::collections::HashMap;

/// Dense integer handle for an interned color.
///
/// `0` is reserved for "no color" ([`ColorMap::UNSET`]).
pub type ColorId = u32;

/// Returns `true` for `#` followed by 3, 4, 6 or 8 hex digits.
pub fn is_valid_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Bidirectional interning table between normalized colors and ids.
///
/// Colors are normalized to upper case, so `#ffffff` and `#FFFFFF` share an
/// id. The table only grows; ids are assigned in first-seen order starting
/// at 1.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    ids: HashMap<String, ColorId>,
    colors: Vec<String>,
}

impl ColorMap {
    /// Id used for channels that have no color.
    pub const UNSET: ColorId = 0;

    /// Creates an empty color map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `color`, assigning a fresh one on first sight.
    pub fn intern(&mut self, color: &str) -> ColorId {
        let normalized = normalize(color);
        if let Some(&id) = self.ids.get(&normalized) {
            return id;
        }
        self.colors.push(normalized.clone());
        let id = self.colors.len() as ColorId;
        self.ids.insert(normalized, id);
        id
    }

    /// Like [`intern`](Self::intern), but maps an absent color to [`UNSET`](Self::UNSET).
    pub fn intern_opt(&mut self, color: Option<&str>) -> ColorId {
        color.map_or(Self::UNSET, |c| self.intern(c))
    }

    /// Looks up the id of an already interned color.
    pub fn id(&self, color: &str) -> Option<ColorId> {
        self.ids.get(&normalize(color)).copied()
    }

    /// Returns the normalized color string for `id`.
    pub fn color(&self, id: ColorId) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.colors.get(index).map(String::as_str)
    }

    /// Number of distinct colors (not counting the reserved unset slot).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates `(id, color)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorId, &str)> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| ((i + 1) as ColorId, c.as_str()))
    }

    /// Snapshot indexed by id; slot 0 is the unset entry.
    pub fn snapshot(&self) -> Vec<Option<String>> {
        std::iter::once(None)
            .chain(self.colors.iter().cloned().map(Some))
            .collect()
    }
}

fn normalize(color: &str) -> String {
    color.to_ascii_uppercase()
}
