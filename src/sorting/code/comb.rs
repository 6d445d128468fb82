use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

/// Gap divisor applied after every pass
pub const SHRINK_FACTOR: f64 = 1.3;

pub struct CombSort;

impl SortAlgorithm for CombSort {
    fn id(&self) -> &'static str {
        "comb"
    }

    fn name(&self) -> &'static str {
        "Comb Sort"
    }

    fn description(&self) -> &'static str {
        "O(n log n) Avg | O(1) Space | Unstable"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(CombSteps::new(Working::new(items, mode)))
    }
}

fn shrink(gap: usize) -> usize {
    ((gap as f64 / SHRINK_FACTOR) as usize).max(1)
}

enum Phase {
    Pass,
    Final,
    Done,
}

/// Comb sort yielding after each swap. Passes continue until the gap is 1
/// and a whole pass swapped nothing.
pub struct CombSteps {
    work: Working,
    gap: usize,
    i: usize,
    swapped: bool,
    phase: Phase,
}

impl CombSteps {
    pub fn new(work: Working) -> Self {
        let n = work.len();
        let phase = if n == 0 { Phase::Done } else { Phase::Pass };
        Self {
            work,
            gap: shrink(n.max(1)),
            i: 0,
            swapped: false,
            phase,
        }
    }

    /// Gap of the pass in progress
    pub fn gap(&self) -> usize {
        self.gap
    }
}

impl Iterator for CombSteps {
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
                    if self.i + self.gap < self.work.len() {
                        let a = self.i;
                        self.i += 1;
                        if self.work.greater(a, a + self.gap) {
                            self.work.swap(a, a + self.gap);
                            self.swapped = true;
                            return Some(self.work.snapshot());
                        }
                    } else if self.gap == 1 && !self.swapped {
                        self.phase = Phase::Final;
                    } else {
                        self.gap = shrink(self.gap);
                        self.i = 0;
                        self.swapped = false;
                    }
                }
            }
        }
    }
}
