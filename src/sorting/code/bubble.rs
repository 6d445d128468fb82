use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct BubbleSort;

impl SortAlgorithm for BubbleSort {
    fn id(&self) -> &'static str {
        "bubble"
    }

    fn name(&self) -> &'static str {
        "Bubble Sort"
    }

    fn description(&self) -> &'static str {
        "O(n^2) Time | O(1) Space | Stable"
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(BubbleSteps::new(Working::new(items, mode)))
    }
}

enum Phase {
    Pass,
    Final,
    Done,
}

/// Yields after every adjacent swap. A pass without swaps ends the sort early.
pub struct BubbleSteps {
    work: Working,
    pass: usize,
    j: usize,
    swapped: bool,
    phase: Phase,
}

impl BubbleSteps {
    pub fn new(work: Working) -> Self {
        let phase = if work.is_empty() { Phase::Done } else { Phase::Pass };
        Self {
            work,
            pass: 0,
            j: 0,
            swapped: false,
            phase,
        }
    }
}

impl Iterator for BubbleSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Final => {
                    self.phase = Phase::Done;
                    return Some(self.work.snapshot());
                }
                Phase::Pass => {
                    let n = self.work.len();
                    let end = n - self.pass;
                    if self.j + 1 < end {
                        let j = self.j;
                        self.j += 1;
                        if self.work.greater(j, j + 1) {
                            self.work.swap(j, j + 1);
                            self.swapped = true;
                            return Some(self.work.snapshot());
                        }
                    } else if !self.swapped || end - 1 < 2 {
                        self.phase = Phase::Final;
                    } else {
                        self.pass += 1;
                        self.j = 0;
                        self.swapped = false;
                    }
                }
            }
        }
    }
}
