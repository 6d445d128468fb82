use std::cmp::Ordering;
use std::ops::Range;

use crate::data::{DataMode, Item, SortKey};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct QuickSort;

impl SortAlgorithm for QuickSort {
    fn id(&self) -> &'static str {
        "quick"
    }

    fn name(&self) -> &'static str {
        "Quick Sort"
    }

    fn description(&self) -> &'static str {
        "O(n log n) Avg | O(log n) Space | Unstable"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(QuickSteps::new(Working::new(items, mode)))
    }
}

/// Three-way partition of `lo..hi` around `pivot`, in progress.
///
/// Invariant: `lo..lt` < pivot, `lt..i` == pivot, `i..gt` unscanned,
/// `gt..hi` > pivot.
struct Partition {
    lo: usize,
    hi: usize,
    lt: usize,
    i: usize,
    gt: usize,
    pivot: SortKey,
}

impl Partition {
    fn new(work: &Working, range: Range<usize>) -> Self {
        let mid = range.start + (range.end - range.start) / 2;
        Self {
            lo: range.start,
            hi: range.end,
            lt: range.start,
            i: range.start,
            gt: range.end,
            pivot: work.key(mid).clone(),
        }
    }
}

/// Quick sort with the middle element as pivot and a three-way partition,
/// so runs of equal keys are settled in one pass and never recursed into.
///
/// Ranges still to be sorted wait on `pending`; the partition being worked
/// on lives in `active` until its scan completes and its two sides are
/// pushed.
pub struct QuickSteps {
    work: Working,
    pending: Vec<Range<usize>>,
    active: Option<Partition>,
    final_pending: bool,
}

impl QuickSteps {
    pub fn new(work: Working) -> Self {
        let n = work.len();
        Self {
            work,
            pending: vec![0..n],
            active: None,
            final_pending: n > 0,
        }
    }
}

impl Iterator for QuickSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            if let Some(p) = &mut self.active {
                if p.i < p.gt {
                    match self.work.key(p.i).cmp(&p.pivot) {
                        Ordering::Less => {
                            let moved = p.lt != p.i;
                            if moved {
                                self.work.swap(p.lt, p.i);
                            }
                            p.lt += 1;
                            p.i += 1;
                            if moved {
                                return Some(self.work.snapshot());
                            }
                        }
                        Ordering::Greater => {
                            p.gt -= 1;
                            if p.i != p.gt {
                                self.work.swap(p.i, p.gt);
                                return Some(self.work.snapshot());
                            }
                        }
                        Ordering::Equal => p.i += 1,
                    }
                    continue;
                }

                // Right side first so the left side is popped next
                let (left, right) = (p.lo..p.lt, p.gt..p.hi);
                self.pending.push(right);
                self.pending.push(left);
                self.active = None;
                continue;
            }

            match self.pending.pop() {
                Some(range) => {
                    if range.len() > 1 {
                        self.active = Some(Partition::new(&self.work, range));
                    }
                }
                None => {
                    if !self.final_pending {
                        return None;
                    }
                    self.final_pending = false;
                    return Some(self.work.snapshot());
                }
            }
        }
    }
}
