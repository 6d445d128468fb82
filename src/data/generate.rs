//! Data generators.
//!
//! Each generator draws from a caller-supplied random source and returns
//! `min(count, feasible maximum)` items, distinct wherever the keyspace allows.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::seq::{index, IndexedRandom};
use rand::Rng;

use super::{Collection, DataMode, Item, Rgb};

/// Channel range for generated colours; keeps clear of black and white
pub const COLOR_CHANNEL: RangeInclusive<u8> = 10..=245;
/// Length range of generated words
pub const WORD_LEN: RangeInclusive<usize> = 3..=7;
/// Upper bound on the number of distinct words produced
pub const MAX_WORDS: usize = 1000;
/// Smallest upper bound of the number range
pub const MIN_NUMBER_SPAN: usize = 100;

const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Generate `count` items for `mode`.
pub fn generate<R: Rng + ?Sized>(mode: DataMode, count: usize, rng: &mut R) -> Collection {
    match mode {
        DataMode::Colors => colors(count, rng),
        DataMode::Numbers => numbers(count, rng),
        DataMode::Words => words(count, rng),
        DataMode::Letters => letters(count, rng),
    }
}

/// Distinct random colours with every channel in [`COLOR_CHANNEL`].
pub fn colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Collection {
    let span = (*COLOR_CHANNEL.end() - *COLOR_CHANNEL.start()) as usize + 1;
    let count = count.min(span * span * span);

    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let rgb = Rgb(
            rng.random_range(COLOR_CHANNEL),
            rng.random_range(COLOR_CHANNEL),
            rng.random_range(COLOR_CHANNEL),
        );
        if seen.insert(rgb) {
            out.push(rgb);
        }
    }
    Collection::colors(out)
}

/// Distinct integers sampled from `1..=max(100, 2 * count)`.
pub fn numbers<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Collection {
    if count == 0 {
        return Collection::numbers([]);
    }
    let max_val = MIN_NUMBER_SPAN.max(count.saturating_mul(2));
    let count = count.min(max_val);
    let picked = index::sample(rng, max_val, count);
    Collection::numbers(picked.into_iter().map(|i| i as i64 + 1))
}

/// Distinct lowercase words of [`WORD_LEN`] letters, at most [`MAX_WORDS`].
pub fn words<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Collection {
    let count = count.min(MAX_WORDS);

    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let len = rng.random_range(WORD_LEN);
        let word: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect();
        if seen.insert(word.clone()) {
            out.push(word);
        }
    }
    Collection::words(out)
}

/// Lowercase letters; without replacement up to 26, with replacement beyond.
pub fn letters<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Collection {
    if count <= ALPHABET.len() {
        Collection::letters(ALPHABET.choose_multiple(rng, count).copied())
    } else {
        Collection::letters((0..count).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]))
    }
}
