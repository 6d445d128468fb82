//! # Sort-Stepper
//!
//! Sorting algorithms that run one step at a time, for animated visualisation.
//!
//! A [`session::SortSession`] drives one algorithm over one [`data::Collection`],
//! publishing a snapshot of the array after every step and recording the
//! duration and memory peak of completed runs.

pub mod config;
pub mod data;
pub mod history;
pub mod pacing;
pub mod registry;
pub mod session;
pub mod sorting;
pub mod tui;
pub mod utils;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::VisualizerConfig;
    pub use crate::data::{generate::generate, Collection, DataMode, Item, Rgb};
    pub use crate::history::{HistorySink, JsonHistory, MemoryHistory, NoHistory};
    pub use crate::pacing::{PaceClock, Pacing};
    pub use crate::registry::{build_registry, AlgorithmRegistry};
    pub use crate::session::{SessionError, SessionState, SortRecord, SortSession, StepOutcome};
    pub use crate::sorting::{SortAlgorithm, Snapshot};
}

#[cfg(test)]
mod tests {
    use crate::registry::build_registry;

    #[test]
    fn test_all_algorithms_registry_verify() {
        let registry = build_registry();
        let algorithms = registry.all();

        println!("Verifying {} algorithms...", algorithms.len());

        for algo in algorithms {
            println!("Verifying algorithm: {}", algo.name());
            match algo.verify() {
                Ok(_) => println!("  ✅ Algorithm '{}' passed verification", algo.name()),
                Err(e) => panic!(
                    "  ❌ Algorithm '{}' failed verification: {}",
                    algo.name(),
                    e
                ),
            }
        }
    }
}
