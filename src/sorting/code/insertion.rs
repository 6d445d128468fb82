use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct InsertionSort;

impl SortAlgorithm for InsertionSort {
    fn id(&self) -> &'static str {
        "insertion"
    }

    fn name(&self) -> &'static str {
        "Insertion Sort"
    }

    fn description(&self) -> &'static str {
        "O(n^2) Time | O(1) Space | Stable"
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(InsertionSteps::new(Working::new(items, mode)))
    }
}

enum Phase {
    Pick,
    Shift,
    Final,
    Done,
}

/// The element being inserted walks left one adjacent swap per step, so each
/// shift is visible without the array ever holding a duplicate.
pub struct InsertionSteps {
    work: Working,
    /// next element to insert
    i: usize,
    /// current position of the element being inserted
    pos: usize,
    phase: Phase,
}

impl InsertionSteps {
    pub fn new(work: Working) -> Self {
        let phase = if work.is_empty() { Phase::Done } else { Phase::Pick };
        Self {
            work,
            i: 1,
            pos: 0,
            phase,
        }
    }
}

impl Iterator for InsertionSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Final => {
                    self.phase = Phase::Done;
                    return Some(self.work.snapshot());
                }
                Phase::Pick => {
                    if self.i >= self.work.len() {
                        self.phase = Phase::Final;
                    } else {
                        self.pos = self.i;
                        self.phase = Phase::Shift;
                    }
                }
                Phase::Shift => {
                    let pos = self.pos;
                    if pos > 0 && self.work.greater(pos - 1, pos) {
                        self.work.swap(pos - 1, pos);
                        self.pos -= 1;
                    } else {
                        // placed
                        self.i += 1;
                        self.phase = Phase::Pick;
                    }
                    return Some(self.work.snapshot());
                }
            }
        }
    }
}
