use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct MergeSort;

impl SortAlgorithm for MergeSort {
    fn id(&self) -> &'static str {
        "merge"
    }

    fn name(&self) -> &'static str {
        "Merge Sort"
    }

    fn description(&self) -> &'static str {
        "O(n log n) Time | O(n) Space | Stable"
    }

    fn is_stable(&self) -> bool {
        true
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(MergeSteps::new(Working::new(items, mode)))
    }
}

/// A pending call of the top-down recursion.
#[derive(Clone, Copy, Debug)]
enum Frame {
    /// sort `start..end`
    Sort { start: usize, end: usize },
    /// merge the sorted runs `start..mid` and `mid..end`
    Merge { start: usize, mid: usize, end: usize },
}

/// Merge in progress: `left..mid` is what remains of the left run,
/// `mid..end` what remains of the right run.
struct Merging {
    left: usize,
    mid: usize,
    end: usize,
}

/// Top-down merge sort driven by an explicit call stack.
///
/// A `Sort` frame pushes its `Merge` frame below its two children, so the
/// merge only runs once both halves have been fully sorted. Merging is done
/// in place: when the head of the right run is strictly smaller than the
/// head of the left run it is rotated in front of it, which keeps the sort
/// stable and makes every moved element one step.
pub struct MergeSteps {
    work: Working,
    stack: Vec<Frame>,
    active: Option<Merging>,
    final_pending: bool,
}

impl MergeSteps {
    pub fn new(work: Working) -> Self {
        let n = work.len();
        let stack = if n > 0 {
            vec![Frame::Sort { start: 0, end: n }]
        } else {
            Vec::new()
        };
        Self {
            work,
            stack,
            active: None,
            final_pending: n > 0,
        }
    }
}

impl Iterator for MergeSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            if let Some(m) = &mut self.active {
                if m.left < m.mid && m.mid < m.end {
                    if self.work.greater(m.left, m.mid) {
                        self.work.rotate_right(m.left..m.mid + 1);
                        m.left += 1;
                        m.mid += 1;
                        return Some(self.work.snapshot());
                    }
                    m.left += 1;
                    continue;
                }
                self.active = None;
                continue;
            }

            match self.stack.pop() {
                Some(Frame::Sort { start, end }) => {
                    if end - start > 1 {
                        let mid = start + (end - start) / 2;
                        self.stack.push(Frame::Merge { start, mid, end });
                        self.stack.push(Frame::Sort { start: mid, end });
                        self.stack.push(Frame::Sort { start, end: mid });
                    }
                }
                Some(Frame::Merge { start, mid, end }) => {
                    self.active = Some(Merging {
                        left: start,
                        mid,
                        end,
                    });
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
