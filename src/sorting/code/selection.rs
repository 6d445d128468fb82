use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct SelectionSort;

impl SortAlgorithm for SelectionSort {
    fn id(&self) -> &'static str {
        "selection"
    }

    fn name(&self) -> &'static str {
        "Selection Sort"
    }

    fn description(&self) -> &'static str {
        "O(n^2) Time | O(1) Space | Unstable"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(SelectionSteps::new(Working::new(items, mode)))
    }
}

/// One snapshot per position: the minimum of the unsorted suffix is swapped
/// into place, or left where it is if it already holds the position.
pub struct SelectionSteps {
    work: Working,
    next: usize,
}

impl SelectionSteps {
    pub fn new(work: Working) -> Self {
        Self { work, next: 0 }
    }
}

impl Iterator for SelectionSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        let i = self.next;
        if i >= self.work.len() {
            return None;
        }

        let mut min = i;
        for j in i + 1..self.work.len() {
            if self.work.key(j) < self.work.key(min) {
                min = j;
            }
        }
        if min != i {
            self.work.swap(i, min);
        }

        self.next += 1;
        Some(self.work.snapshot())
    }
}
