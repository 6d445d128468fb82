use crate::data::{DataMode, Item};
use crate::sorting::{Snapshot, SnapshotSeq, SortAlgorithm, Working};

pub struct HeapSort;

impl SortAlgorithm for HeapSort {
    fn id(&self) -> &'static str {
        "heap"
    }

    fn name(&self) -> &'static str {
        "Heap Sort"
    }

    fn description(&self) -> &'static str {
        "O(n log n) Time | O(1) Space | Unstable"
    }

    fn is_stable(&self) -> bool {
        false
    }

    fn snapshots(&self, items: Vec<Item>, mode: DataMode) -> SnapshotSeq {
        Box::new(HeapSteps::new(Working::new(items, mode)))
    }
}

#[derive(Clone, Copy, Debug)]
enum Task {
    /// restore the max-heap property below `node` within `..len`
    Heapify { node: usize, len: usize },
    /// move the root to `end` and shrink the heap
    Extract { end: usize },
}

/// Max-heap sort. Every heapify call that swaps pushes its recursive call on
/// the task stack, so it runs before whatever was pending underneath it.
pub struct HeapSteps {
    work: Working,
    tasks: Vec<Task>,
    final_pending: bool,
}

impl HeapSteps {
    pub fn new(work: Working) -> Self {
        let n = work.len();
        let mut tasks = Vec::with_capacity(n / 2 + 1);
        if n > 0 {
            tasks.push(Task::Extract { end: n - 1 });
            // Popped from the last parent down to the root
            tasks.extend((0..n / 2).map(|node| Task::Heapify { node, len: n }));
        }
        Self {
            work,
            tasks,
            final_pending: n > 0,
        }
    }
}

impl Iterator for HeapSteps {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match self.tasks.pop() {
                Some(Task::Heapify { node, len }) => {
                    let left = 2 * node + 1;
                    let right = left + 1;
                    let mut largest = node;
                    if left < len && self.work.greater(left, largest) {
                        largest = left;
                    }
                    if right < len && self.work.greater(right, largest) {
                        largest = right;
                    }
                    if largest != node {
                        self.work.swap(node, largest);
                        self.tasks.push(Task::Heapify { node: largest, len });
                        return Some(self.work.snapshot());
                    }
                }
                Some(Task::Extract { end }) => {
                    if end > 0 {
                        self.work.swap(0, end);
                        self.tasks.push(Task::Extract { end: end - 1 });
                        self.tasks.push(Task::Heapify { node: 0, len: end });
                        return Some(self.work.snapshot());
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
