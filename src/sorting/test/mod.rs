use super::code::*;
use super::{collect_snapshots, item_counts, SortAlgorithm, Snapshot};
use crate::data::generate::generate;
use crate::data::{key_of, Collection, DataMode, Item, SortKey};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn all_algorithms() -> Vec<Box<dyn SortAlgorithm>> {
    vec![
        Box::new(SelectionSort),
        Box::new(BubbleSort),
        Box::new(InsertionSort),
        Box::new(MergeSort),
        Box::new(QuickSort),
        Box::new(HeapSort),
        Box::new(CombSort),
    ]
}

fn as_numbers(snapshot: &Snapshot) -> Vec<i64> {
    snapshot
        .iter()
        .map(|it| match it {
            Item::Number(n) => *n,
            other => panic!("expected a number, got {:?}", other),
        })
        .collect()
}

fn keys(mode: DataMode, snapshot: &[Item]) -> Vec<SortKey> {
    snapshot.iter().map(|it| key_of(mode, it)).collect()
}

fn is_sorted(keys: &[SortKey]) -> bool {
    keys.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn test_selection_yields_once_per_position() {
    let data = Collection::numbers([5, 3, 1, 4, 2]);
    let steps: Vec<Vec<i64>> = collect_snapshots(&SelectionSort, &data)
        .iter()
        .map(as_numbers)
        .collect();
    assert_eq!(
        steps,
        vec![
            vec![1, 3, 5, 4, 2],
            vec![1, 2, 5, 4, 3],
            vec![1, 2, 3, 4, 5],
            vec![1, 2, 3, 4, 5],
            vec![1, 2, 3, 4, 5],
        ]
    );
}

#[test]
fn test_bubble_sorted_input_single_snapshot() {
    let data = Collection::numbers([1, 2, 3, 4, 5]);
    let steps = collect_snapshots(&BubbleSort, &data);
    assert_eq!(steps.len(), 1, "no swaps, only the final state");
    assert_eq!(as_numbers(&steps[0]), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_bubble_yields_per_swap() {
    let data = Collection::numbers([3, 1, 2]);
    let steps: Vec<Vec<i64>> = collect_snapshots(&BubbleSort, &data)
        .iter()
        .map(as_numbers)
        .collect();
    assert_eq!(steps, vec![vec![1, 3, 2], vec![1, 2, 3], vec![1, 2, 3]]);
}

#[test]
fn test_insertion_words() {
    let data = Collection::words(["pear", "apple", "mango"]);
    let steps = collect_snapshots(&InsertionSort, &data);
    assert_eq!(steps.len(), 5);
    assert_eq!(
        steps.last().unwrap(),
        &vec![
            Item::Word("apple".into()),
            Item::Word("mango".into()),
            Item::Word("pear".into()),
        ]
    );
}

#[test]
fn test_all_algorithms_sort_every_mode() {
    let mut rng = StdRng::seed_from_u64(11);
    for mode in DataMode::ALL {
        let data = generate(mode, 64, &mut rng);
        for algo in all_algorithms() {
            let steps = collect_snapshots(algo.as_ref(), &data);
            let input = item_counts(data.items());
            for (i, step) in steps.iter().enumerate() {
                assert_eq!(
                    item_counts(step),
                    input,
                    "{} on {}: snapshot {} is not a permutation of the input",
                    algo.name(),
                    mode,
                    i
                );
            }
            let last = steps.last().expect("non-empty input yields a final snapshot");
            assert!(
                is_sorted(&keys(mode, last)),
                "{} left {} unsorted",
                algo.name(),
                mode
            );
        }
    }
}

#[test]
fn test_sorted_input_stays_in_key_order() {
    let data = Collection::numbers(1..=20);
    for algo in all_algorithms() {
        let steps = collect_snapshots(algo.as_ref(), &data);
        assert_eq!(
            as_numbers(steps.last().unwrap()),
            (1..=20).collect::<Vec<_>>(),
            "{}",
            algo.name()
        );
    }
}

#[test]
fn test_stable_algorithms_keep_equal_keys_in_order() {
    let data = Collection::words([
        "pear", "Apple", "mango", "apple", "kiwi", "APPLE", "Kiwi", "aPPle",
    ]);
    for algo in [
        Box::new(MergeSort) as Box<dyn SortAlgorithm>,
        Box::new(InsertionSort),
        Box::new(BubbleSort),
    ] {
        assert!(algo.is_stable());
        let steps = collect_snapshots(algo.as_ref(), &data);
        let words: Vec<String> = steps.last().unwrap().iter().map(|w| w.to_string()).collect();
        assert_eq!(
            words,
            vec!["Apple", "apple", "APPLE", "aPPle", "kiwi", "Kiwi", "mango", "pear"],
            "{}",
            algo.name()
        );
    }

    let letters = Collection::letters(['b', 'A', 'a', 'B', 'c', 'C']);
    let last = collect_snapshots(&MergeSort, &letters).pop().unwrap();
    let got: String = last.iter().map(|l| l.to_string()).collect();
    assert_eq!(got, "AabBcC");
}

#[test]
fn test_empty_and_single_input() {
    let empty = Collection::numbers([]);
    let single = Collection::numbers([7]);
    for algo in all_algorithms() {
        assert!(collect_snapshots(algo.as_ref(), &empty).is_empty(), "{}", algo.name());
        let steps = collect_snapshots(algo.as_ref(), &single);
        assert!(!steps.is_empty(), "{}", algo.name());
        assert!(steps.iter().all(|s| as_numbers(s) == vec![7]));
    }
}

#[test]
fn test_swap_based_steps_touch_at_most_two_positions() {
    let data = Collection::numbers([9, 2, 7, 7, 1, 8, 3, 3, 6, 0, 5, 4]);
    for algo in [
        Box::new(SelectionSort) as Box<dyn SortAlgorithm>,
        Box::new(BubbleSort),
        Box::new(InsertionSort),
        Box::new(QuickSort),
        Box::new(HeapSort),
        Box::new(CombSort),
    ] {
        let mut prev = data.items().to_vec();
        for step in collect_snapshots(algo.as_ref(), &data) {
            let changed = prev.iter().zip(&step).filter(|(a, b)| a != b).count();
            assert!(changed <= 2, "{} changed {} positions in one step", algo.name(), changed);
            prev = step;
        }
    }
}

#[test]
fn test_merge_moves_one_element_per_step() {
    let data = Collection::numbers([4, 3, 2, 1]);
    let steps: Vec<Vec<i64>> = collect_snapshots(&MergeSort, &data)
        .iter()
        .map(as_numbers)
        .collect();
    assert_eq!(
        steps,
        vec![
            vec![3, 4, 2, 1],
            vec![3, 4, 1, 2],
            vec![1, 3, 4, 2],
            vec![1, 2, 3, 4],
            vec![1, 2, 3, 4],
        ]
    );
}

#[test]
fn test_quick_handles_duplicates() {
    let all_equal = Collection::numbers([4; 50]);
    let steps = collect_snapshots(&QuickSort, &all_equal);
    assert_eq!(steps.len(), 1, "equal keys need no swaps");

    let data = Collection::numbers((0..200).map(|i| i % 3));
    let last = collect_snapshots(&QuickSort, &data).pop().unwrap();
    let values = as_numbers(&last);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_heap_extracts_every_root() {
    let data = Collection::numbers((1..=16).rev());
    let steps = collect_snapshots(&HeapSort, &data);
    // at least one snapshot per extraction plus the final state
    assert!(steps.len() >= 16);
    assert_eq!(as_numbers(steps.last().unwrap()), (1..=16).collect::<Vec<_>>());
}

#[test]
fn test_comb_terminates_on_reverse_and_sorted() {
    for data in [
        Collection::numbers((0..300).rev()),
        Collection::numbers(0..300),
    ] {
        let last = collect_snapshots(&CombSort, &data).pop().unwrap();
        assert_eq!(as_numbers(&last), (0..300).collect::<Vec<_>>());
    }
}

#[test]
fn test_comb_gap_shrinks_by_factor() {
    let data = Collection::numbers((0..100).rev());
    let steps = CombSteps::new(super::Working::new(data.into_items(), DataMode::Numbers));
    assert_eq!(steps.gap(), 76);
}

#[test]
fn test_runs_suspend_and_resume_independently() {
    let mut rng = StdRng::seed_from_u64(99);
    let a = generate(DataMode::Numbers, 40, &mut rng);
    let b = generate(DataMode::Numbers, 40, &mut rng);

    for algo in all_algorithms() {
        let expected_a = collect_snapshots(algo.as_ref(), &a);
        let expected_b = collect_snapshots(algo.as_ref(), &b);

        let mut run_a = algo.snapshots(a.items().to_vec(), DataMode::Numbers);
        let mut run_b = algo.snapshots(b.items().to_vec(), DataMode::Numbers);
        let (mut got_a, mut got_b) = (Vec::new(), Vec::new());
        loop {
            let next_a = run_a.next();
            let next_b = run_b.next();
            if next_a.is_none() && next_b.is_none() {
                break;
            }
            got_a.extend(next_a);
            got_b.extend(next_b);
        }
        assert_eq!(got_a, expected_a, "{}", algo.name());
        assert_eq!(got_b, expected_b, "{}", algo.name());
        assert!(run_a.next().is_none(), "{} must stay exhausted", algo.name());
    }
}

#[test]
fn test_input_is_not_aliased() {
    let data = Collection::numbers([3, 2, 1]);
    let before = data.clone();
    for algo in all_algorithms() {
        let _ = collect_snapshots(algo.as_ref(), &data);
    }
    assert_eq!(data, before);
}
