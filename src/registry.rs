//! Algorithm registry for discovering steppable sorts by name.
//!
//! The driver looks algorithms up here instead of hard-coding them, and the
//! session keeps a shared handle so a finished run can be restarted.

use std::sync::Arc;

use crate::sorting::{
    BubbleSort, CombSort, HeapSort, InsertionSort, MergeSort, QuickSort, SelectionSort,
    SortAlgorithm,
};

/// Catalogue of all available algorithms
pub struct AlgorithmRegistry {
    algorithms: Vec<Arc<dyn SortAlgorithm>>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }

    /// Register an algorithm
    pub fn register<A: SortAlgorithm + 'static>(&mut self, algo: A) {
        self.algorithms.push(Arc::new(algo));
    }

    /// Get all registered algorithms, in registration order
    pub fn all(&self) -> &[Arc<dyn SortAlgorithm>] {
        &self.algorithms
    }

    /// Find an algorithm by id ("merge") or display name ("Merge Sort"), ignoring case
    pub fn find(&self, name: &str) -> Option<Arc<dyn SortAlgorithm>> {
        let name = name.trim();
        self.algorithms
            .iter()
            .find(|a| a.id().eq_ignore_ascii_case(name) || a.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Algorithm at a position of the catalogue, wrapping around
    pub fn cycle(&self, index: usize) -> Option<Arc<dyn SortAlgorithm>> {
        if self.algorithms.is_empty() {
            return None;
        }
        self.algorithms.get(index % self.algorithms.len()).cloned()
    }

    /// List algorithm ids
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default registry with all algorithms
pub fn build_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();

    registry.register(SelectionSort);
    registry.register(BubbleSort);
    registry.register(InsertionSort);
    registry.register(MergeSort);
    registry.register(QuickSort);
    registry.register(HeapSort);
    registry.register(CombSort);

    registry
}
