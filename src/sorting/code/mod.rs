//! Steppable algorithm implementations.
//!
//! Each file holds the unit struct registered in the catalogue and the
//! iterator type that carries one run's state between steps.

mod bubble;
mod comb;
mod heap;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::{BubbleSort, BubbleSteps};
pub use comb::{CombSort, CombSteps, SHRINK_FACTOR};
pub use heap::{HeapSort, HeapSteps};
pub use insertion::{InsertionSort, InsertionSteps};
pub use merge::{MergeSort, MergeSteps};
pub use quick::{QuickSort, QuickSteps};
pub use selection::{SelectionSort, SelectionSteps};
