use std::sync::Arc;

use crate::data::{Collection, DataMode, Item};
use crate::history::{JsonHistory, MemoryHistory};
use crate::session::{SessionError, SessionState, SortSession, StepOutcome};
use crate::sorting::{
    BubbleSort, MergeSort, QuickSort, SelectionSort, SnapshotSeq, SortAlgorithm,
};
use crate::utils::memory::NoProbe;

/// Yields one good snapshot, then panics
struct Exploding;

impl SortAlgorithm for Exploding {
    fn id(&self) -> &'static str {
        "exploding"
    }
    fn name(&self) -> &'static str {
        "Exploding Sort"
    }
    fn description(&self) -> &'static str {
        "panics on its second step"
    }
    fn is_stable(&self) -> bool {
        false
    }
    fn snapshots(&self, items: Vec<Item>, _mode: DataMode) -> SnapshotSeq {
        let mut step = 0;
        Box::new(std::iter::from_fn(move || {
            step += 1;
            if step > 1 {
                panic!("comparison blew up");
            }
            Some(items.clone())
        }))
    }
}

/// Drops an item from its only snapshot
struct Lossy;

impl SortAlgorithm for Lossy {
    fn id(&self) -> &'static str {
        "lossy"
    }
    fn name(&self) -> &'static str {
        "Lossy Sort"
    }
    fn description(&self) -> &'static str {
        "loses the last item"
    }
    fn is_stable(&self) -> bool {
        false
    }
    fn snapshots(&self, mut items: Vec<Item>, _mode: DataMode) -> SnapshotSeq {
        items.pop();
        Box::new(std::iter::once(items))
    }
}

fn session() -> (SortSession, MemoryHistory) {
    let history = MemoryHistory::new();
    let session = SortSession::new()
        .with_history(history.clone())
        .with_probe(NoProbe);
    (session, history)
}

fn drain(session: &mut SortSession) -> usize {
    let mut steps = 0;
    while session.advance_one() == Ok(StepOutcome::Continuing) {
        steps += 1;
    }
    steps
}

fn numbers(values: &[i64]) -> Vec<Item> {
    values.iter().copied().map(Item::Number).collect()
}

#[test]
fn test_new_session_is_idle() {
    let (mut session, _) = session();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.advance_one(), Ok(StepOutcome::Idle));
    assert!(session.current().is_empty());
    assert_eq!(session.restart(), Err(SessionError::NothingToRestart));
}

#[test]
fn test_start_on_empty_input_changes_nothing() {
    let (mut session, history) = session();
    let err = session.start(Arc::new(MergeSort), &Collection::numbers([]));
    assert_eq!(err, Err(SessionError::EmptyInput));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.algorithm().is_none());
    assert!(history.is_empty());
}

#[test]
fn test_empty_start_keeps_running_sort() {
    let (mut session, _) = session();
    let data = Collection::numbers([4, 3, 2, 1]);
    session.start(Arc::new(MergeSort), &data).unwrap();
    session.advance_one().unwrap();

    assert!(session.start(Arc::new(QuickSort), &Collection::numbers([])).is_err());
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.algorithm().map(|a| a.id()), Some("merge"));
    assert_eq!(session.steps(), 1);
}

#[test]
fn test_full_run_records_once() {
    let (mut session, history) = session();
    let data = Collection::numbers([4, 3, 2, 1]);
    session.start(Arc::new(MergeSort), &data).unwrap();
    assert_eq!(session.state(), SessionState::Running);

    let steps = drain(&mut session);
    assert_eq!(steps, 5);
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(&*session.current(), numbers(&[1, 2, 3, 4]).as_slice());

    // Further calls do not record again
    assert_eq!(session.advance_one(), Ok(StepOutcome::Finished));
    assert_eq!(session.advance_one(), Ok(StepOutcome::Finished));
    assert_eq!(history.len(), 1);
    assert_eq!(session.completed().len(), 1);

    let record = &history.records()[0];
    assert_eq!(record.algorithm, "Merge Sort");
    assert_eq!(record.data_mode, DataMode::Numbers);
    assert_eq!(record.input.count, 4);
    assert_eq!(record.peak_memory_kb, None);
    assert!(record.duration_ms >= 0.0);
}

#[test]
fn test_original_is_preserved() {
    let (mut session, _) = session();
    let data = Collection::numbers([3, 1, 2]);
    session.start(Arc::new(BubbleSort), &data).unwrap();

    let before = session.current();
    session.advance_one().unwrap();
    let after = session.current();

    assert_eq!(&*before, numbers(&[3, 1, 2]).as_slice());
    assert_eq!(&*after, numbers(&[1, 3, 2]).as_slice());
    drain(&mut session);
    assert_eq!(session.original(), Some(&data));
}

#[test]
fn test_start_supersedes_active_run() {
    let (mut session, history) = session();
    let data = Collection::numbers([5, 4, 3, 2, 1]);
    session.start(Arc::new(BubbleSort), &data).unwrap();
    session.advance_one().unwrap();
    session.advance_one().unwrap();

    session.start(Arc::new(SelectionSort), &data).unwrap();
    assert_eq!(session.steps(), 0);
    assert_eq!(&*session.current(), data.items());
    drain(&mut session);

    let names: Vec<String> = history.records().into_iter().map(|r| r.algorithm).collect();
    assert_eq!(names, vec!["Selection Sort"]);
}

#[test]
fn test_stop_is_idempotent() {
    let (mut session, history) = session();
    session.stop();
    session.start(Arc::new(QuickSort), &Collection::numbers([2, 1])).unwrap();
    session.stop();
    session.stop();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.advance_one(), Ok(StepOutcome::Idle));
    assert!(history.is_empty());
}

#[test]
fn test_panicking_algorithm_is_contained() {
    let (mut session, history) = session();
    let data = Collection::numbers([2, 1, 3]);
    session.start(Arc::new(Exploding), &data).unwrap();

    assert_eq!(session.advance_one(), Ok(StepOutcome::Continuing));
    match session.advance_one() {
        Err(SessionError::SequenceFault { algorithm, step, reason }) => {
            assert_eq!(algorithm, "Exploding Sort");
            assert_eq!(step, 2);
            assert!(reason.contains("comparison blew up"));
        }
        other => panic!("expected a fault, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::Idle);
    assert!(history.is_empty());

    // The session stays usable
    session.start(Arc::new(MergeSort), &data).unwrap();
    drain(&mut session);
    assert_eq!(history.len(), 1);
}

#[test]
fn test_wrong_length_snapshot_is_a_fault() {
    let (mut session, history) = session();
    session.start(Arc::new(Lossy), &Collection::numbers([2, 1, 3])).unwrap();
    let err = session.advance_one().unwrap_err();
    assert!(matches!(err, SessionError::SequenceFault { step: 1, .. }));
    assert_eq!(&*session.current(), numbers(&[2, 1, 3]).as_slice());
    assert!(history.is_empty());
}

#[test]
fn test_restart_reruns_last_algorithm() {
    let (mut session, history) = session();
    let data = Collection::letters("dcba".chars());
    session.start(Arc::new(QuickSort), &data).unwrap();
    drain(&mut session);

    session.restart().unwrap();
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(&*session.current(), data.items());
    drain(&mut session);

    assert_eq!(history.len(), 2);
    let rows = session.comparison();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "Quick Sort");
    assert_eq!(rows[0].1.runs, 2);
}

#[test]
fn test_load_shows_data_without_running() {
    let (mut session, _) = session();
    let data = Collection::words(["pear", "fig"]);
    session.load(data.clone());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.mode(), Some(DataMode::Words));
    assert_eq!(&*session.current(), data.items());
}

#[test]
fn test_elapsed_freezes_after_finish() {
    let (mut session, _) = session();
    assert!(session.elapsed().is_none());
    session.start(Arc::new(BubbleSort), &Collection::numbers([2, 1])).unwrap();
    drain(&mut session);
    let a = session.elapsed();
    let b = session.elapsed();
    assert!(a.is_some());
    assert_eq!(a, b);
}

#[test]
fn test_clear_results() {
    let (mut session, _) = session();
    session.start(Arc::new(BubbleSort), &Collection::numbers([2, 1])).unwrap();
    drain(&mut session);
    assert!(session.last_record().is_some());
    session.clear_results();
    assert!(session.completed().is_empty());
    assert!(session.comparison().is_empty());
}

#[test]
fn test_back_to_back_runs_each_get_a_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let history = JsonHistory::create(dir.path()).unwrap();
    let mut session = SortSession::new().with_history(history).with_probe(NoProbe);
    let data = Collection::numbers([3, 1, 2]);

    for _ in 0..3 {
        session.start(Arc::new(BubbleSort), &data).unwrap();
        drain(&mut session);
    }

    let run_files = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("sort_Bubble_Sort_numbers_"))
        .count();
    assert_eq!(session.completed().len(), 3);
    assert_eq!(run_files, 3);
}
