//! Comparison keys.
//!
//! `key_of(mode, item)` is pure and total: an item that cannot produce a
//! meaningful key for the requested mode gets that mode's default key instead
//! of failing, so no algorithm can abort on key extraction.

use std::cmp::Ordering;

use super::{DataMode, Item, Rgb};

/// Orderable value derived from an item.
#[derive(Clone, Debug)]
pub enum SortKey {
    /// Hue angle in degrees, in `[0, 360)`
    Hue(f64),
    Number(i64),
    Text(String),
    Char(char),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Hue(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Char(_) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Hue(a), SortKey::Hue(b)) => a.total_cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Char(a), SortKey::Char(b)) => a.cmp(b),
            // Only reachable for keys of different modes
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Signature shared by the per-mode extractors
pub type KeyFn = fn(&Item) -> SortKey;

/// Extractor used for `mode`.
pub const fn extractor(mode: DataMode) -> KeyFn {
    match mode {
        DataMode::Colors => color_key,
        DataMode::Numbers => number_key,
        DataMode::Words => word_key,
        DataMode::Letters => letter_key,
    }
}

/// Key of `item` under `mode`.
#[inline]
pub fn key_of(mode: DataMode, item: &Item) -> SortKey {
    extractor(mode)(item)
}

fn color_key(item: &Item) -> SortKey {
    match item {
        Item::Color(rgb) => SortKey::Hue(hue(*rgb)),
        _ => SortKey::Hue(0.0),
    }
}

fn number_key(item: &Item) -> SortKey {
    match item {
        Item::Number(n) => SortKey::Number(*n),
        _ => SortKey::Number(0),
    }
}

fn word_key(item: &Item) -> SortKey {
    match item {
        Item::Word(w) => SortKey::Text(w.to_lowercase()),
        Item::Letter(c) => SortKey::Text(c.to_lowercase().collect()),
        _ => SortKey::Text(String::new()),
    }
}

fn letter_key(item: &Item) -> SortKey {
    match item {
        Item::Letter(c) => SortKey::Char(c.to_lowercase().next().unwrap_or(*c)),
        _ => SortKey::Char('\0'),
    }
}

/// HSV hue of an RGB colour in degrees. Greys have no hue and map to 0.
pub fn hue(Rgb(r, g, b): Rgb) -> f64 {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= 0.0 {
        return 0.0;
    }

    let h = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    if h.is_finite() {
        h.rem_euclid(360.0)
    } else {
        0.0
    }
}
