//! # Steppable sorting
//!
//! Every algorithm here is an explicit state machine implementing
//! `Iterator<Item = Snapshot>`: one call to `next()` performs one unit of
//! work and hands back a full copy of the array. The recursive algorithms keep
//! their pending sub-problems on an explicit frame stack, so a suspension in
//! the middle of a deep recursion resumes exactly where it stopped.
//!
//! ## Snapshot granularity
//!
//! | Algorithm | Yields after |
//! |-----------|--------------|
//! | selection | each outer position (also when nothing moved) |
//! | bubble    | each adjacent swap |
//! | insertion | each shift and each placement |
//! | merge     | each element rotated in from the right run |
//! | quick     | each partition swap that moves items |
//! | heap      | each sift-down swap and each root extraction |
//! | comb      | each swap |
//!
//! All algorithms but selection finish with one extra snapshot of the sorted
//! array. Empty input yields nothing. Every snapshot is a permutation of the
//! input: shifts and merges are done by swaps and rotations.

pub mod code;
#[cfg(test)]
mod test;

pub use code::*;

use std::collections::HashMap;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::key::extractor;
use crate::data::{generate, Collection, DataMode, Item, SortKey};

/// Full copy of the working array at one point of a sort
pub type Snapshot = Vec<Item>;

/// Lazy, finite, non-restartable sequence of snapshots
pub type SnapshotSeq = Box<dyn Iterator<Item = Snapshot>>;

/// Trait implemented by every steppable algorithm
pub trait SortAlgorithm: Send + Sync {
    /// Short identifier used on the command line (e.g. "merge")
    fn id(&self) -> &'static str;

    /// Display name (e.g. "Merge Sort")
    fn name(&self) -> &'static str;

    /// Complexity and stability blurb
    fn description(&self) -> &'static str;

    /// Whether equal keys keep their input order
    fn is_stable(&self) -> bool;

    /// Start a new run over a private copy of the data.
    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq;

    /// Check the algorithm against reference data in every mode
    fn verify(&self) -> Result<(), String> {
        verify_algorithm(self)
    }
}

/// Working array of a run, with each item's key cached alongside it.
///
/// Keys move together with their items so comparisons never re-extract.
pub struct Working {
    items: Vec<Item>,
    keys: Vec<SortKey>,
}

impl Working {
    pub fn new(items: Vec<Item>, mode: DataMode) -> Self {
        let key = extractor(mode);
        let keys = items.iter().map(key).collect();
        Self { items, keys }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn key(&self, i: usize) -> &SortKey {
        &self.keys[i]
    }

    /// `key(a) > key(b)`
    #[inline]
    pub fn greater(&self, a: usize, b: usize) -> bool {
        self.keys[a] > self.keys[b]
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.keys.swap(a, b);
    }

    /// Move the last element of `range` to its front, shifting the rest right.
    pub fn rotate_right(&mut self, range: Range<usize>) {
        self.items[range.clone()].rotate_right(1);
        self.keys[range].rotate_right(1);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.items.clone()
    }
}

/// Drain a run of `algorithm` over `data`.
pub fn collect_snapshots<A: SortAlgorithm + ?Sized>(algorithm: &A, data: &Collection) -> Vec<Snapshot> {
    algorithm
        .snapshots(data.items().to_vec(), data.mode())
        .collect()
}

/// Multiplicity of every distinct item
pub fn item_counts(items: &[Item]) -> HashMap<&Item, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

fn reference_collections() -> Vec<Collection> {
    let mut rng = StdRng::seed_from_u64(0x0005_0127);
    let mut fixtures = vec![
        Collection::numbers([]),
        Collection::numbers([42]),
        Collection::numbers([5, 3, 1, 4, 2]),
        Collection::numbers(1..=32),
        Collection::numbers((1..=32).rev()),
        Collection::numbers([7, 3, 7, 1, 3, 7, 7, 1, 0, 3]),
        Collection::numbers([9; 12]),
        Collection::words(["pear", "Apple", "mango", "apple", "APPLE", "kiwi"]),
        Collection::letters("QuickBrownFox".chars()),
    ];
    for mode in DataMode::ALL {
        fixtures.push(generate::generate(mode, 97, &mut rng));
    }
    fixtures
}

/// Run `algorithm` on reference data and check each run ends sorted
/// without losing or duplicating items.
pub fn verify_algorithm<A: SortAlgorithm + ?Sized>(algorithm: &A) -> Result<(), String> {
    for data in reference_collections() {
        let snapshots = collect_snapshots(algorithm, &data);

        if data.is_empty() {
            if snapshots.iter().any(|s| !s.is_empty()) {
                return Err(format!("'{}' produced items from empty input", algorithm.name()));
            }
            continue;
        }

        if let Some(bad) = snapshots.iter().position(|s| s.len() != data.len()) {
            return Err(format!(
                "'{}' snapshot {} has {} items, expected {}",
                algorithm.name(),
                bad,
                snapshots[bad].len(),
                data.len()
            ));
        }

        let last = snapshots
            .last()
            .ok_or_else(|| format!("'{}' yielded nothing for {} items", algorithm.name(), data.len()))?;
        let key = extractor(data.mode());
        let got: Vec<SortKey> = last.iter().map(key).collect();
        if got.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!(
                "'{}' left {} data unsorted",
                algorithm.name(),
                data.mode()
            ));
        }

        if item_counts(data.items()) != item_counts(last) {
            return Err(format!(
                "'{}' did not preserve the input items for {} data",
                algorithm.name(),
                data.mode()
            ));
        }
    }
    Ok(())
}
