use anyhow::Result;
use ironstream::collectors::*;
use ironstream::testing::*;
use ironstream::*;
use std::time::Duration;

fn with(p: usize) -> ParallelConfig {
    ParallelConfig::default().with_parallelism(p)
}

#[test]
fn grouping_and_counting_match_sequential_for_any_chunking() -> Result<()> {
    let words = from_vec(
        "the cat and the dog and the bird saw a cat"
            .split(' ')
            .map(String::from)
            .collect::<Vec<_>>(),
    );
    let counts = assert_parallel_matches_sequential(
        &words,
        || grouping_by(|w: &String| w.clone(), counting()),
        &[1, 2, 3, 5, 11, 64],
    );
    assert_eq!(counts["the"], 3);
    assert_eq!(counts["cat"], 2);

    let n = assert_parallel_matches_sequential(&range(0..10_007), counting, &[1, 4, 16]);
    assert_eq!(n, 10_007);
    Ok(())
}

#[test]
fn ordered_collectors_keep_encounter_order_in_parallel() -> Result<()> {
    let p = range(0..200).map(|n: &i64| n.to_string());
    let list = assert_parallel_matches_sequential(&p, to_list, &[2, 7, 13]);
    assert_eq!(list.len(), 200);
    let joined = assert_parallel_matches_sequential(&p, || joining(","), &[3, 8]);
    assert!(joined.starts_with("0,1,2,"));
    Ok(())
}

#[test]
fn reduce_par_requires_a_commutative_operator() -> Result<()> {
    let p = range(1..101);
    assert_eq!(p.reduce_par(|a, b| a + b, MergeLaw::Commutative)?, Some(5050));

    let err = p
        .reduce_par(|a, b| a - b, MergeLaw::Associative)
        .unwrap_err();
    assert!(matches!(err, StreamError::UnsupportedForParallel(_)));

    let empty = range(0..0);
    assert_eq!(empty.reduce_par(|a, b| a + b, MergeLaw::Commutative)?, None);
    Ok(())
}

#[test]
fn sequential_only_collector_is_rejected_before_dispatch() -> Result<()> {
    let first_seen = collector_of(
        || None::<i64>,
        |acc: &mut Option<i64>, x: i64| {
            acc.get_or_insert(x);
        },
        |_: &mut Option<i64>, _: Option<i64>| {},
        |acc: Option<i64>| acc,
        MergeLaw::SequentialOnly,
    );
    let mut coordinator = Coordinator::new(with(4));
    let err = coordinator.collect(&range(0..10), first_seen).unwrap_err();
    assert!(matches!(err, StreamError::UnsupportedForParallel(_)));
    assert_eq!(coordinator.state(), CoordinatorState::Failed);
    assert_eq!(coordinator.metrics().chunks, 0);
    Ok(())
}

#[test]
fn failing_chunk_is_identified() -> Result<()> {
    // 4 chunks of 25: element 60 lives in chunk 2, at offset 10.
    let p = range(0..100).try_map(|n: &i64| {
        anyhow::ensure!(*n != 60, "bad element {n}");
        Ok(*n)
    });
    let mut coordinator = Coordinator::new(with(4));
    let err = coordinator.collect(&p, counting()).unwrap_err();

    assert_eq!(err.chunk(), Some(2));
    assert!(matches!(
        err.root(),
        StreamError::Stage { stage: 0, kind: "map", position: 10, .. }
    ));
    assert_eq!(coordinator.state(), CoordinatorState::Failed);
    assert_eq!(coordinator.metrics().failed_chunk, Some(2));
    Ok(())
}

#[test]
fn deadline_produces_timeout() -> Result<()> {
    let slow = range(0..1_000).map(|n: &i64| {
        std::thread::sleep(Duration::from_millis(2));
        *n
    });
    let config = with(2).with_deadline(Duration::from_millis(20));
    let mut coordinator = Coordinator::new(config);
    match coordinator.collect(&slow, counting()) {
        Err(StreamError::Timeout { completed, cancelled }) => {
            assert_eq!(completed + cancelled, 2);
            assert!(cancelled >= 1);
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert_eq!(coordinator.metrics().cancelled_chunks, 2 - coordinator.metrics().completed_chunks);
    Ok(())
}

#[test]
fn chunk_partition_sizes_differ_by_at_most_one() -> Result<()> {
    for (len, parts) in [(10, 3), (7, 7), (3, 8), (1000, 6), (0, 4)] {
        let sizes = ChunkPartition::split(0..len, parts).sizes();
        let max = sizes.iter().copied().max().unwrap_or(0);
        let min = sizes.iter().copied().min().unwrap_or(0);
        assert!(max - min <= 1, "{sizes:?}");
        assert_eq!(sizes.iter().sum::<usize>(), len);
    }

    let mut coordinator = Coordinator::new(with(3));
    coordinator.collect(&range(0..10), counting())?;
    assert_eq!(coordinator.state(), CoordinatorState::Done);
    assert_eq!(coordinator.metrics().chunk_sizes, vec![4, 3, 3]);
    assert_eq!(coordinator.metrics().elements_pulled, 10);
    assert_eq!(coordinator.metrics().completed_chunks, 3);
    Ok(())
}

#[test]
fn unbounded_sources_are_rejected() -> Result<()> {
    let (numbers, _) = counting_source();
    assert!(matches!(numbers.count_par(), Err(StreamError::UnsupportedForParallel(_))));

    let infinite = random_ints(RandomGenerator::seeded(1), 0, 10, None)?;
    assert!(matches!(infinite.count_par(), Err(StreamError::UnsupportedForParallel(_))));
    Ok(())
}

#[test]
fn bounded_single_pass_sources_run_in_parallel() -> Result<()> {
    let draws = random_ints(RandomGenerator::seeded(9), 0, 6, Some(600))?;
    let same = random_ints(RandomGenerator::seeded(9), 0, 6, Some(600))?;
    let histogram = draws.collect_par_with(grouping_by(|n: &i64| *n, counting()), with(4))?;
    assert_eq!(histogram, same.collect(grouping_by(|n: &i64| *n, counting()))?);
    assert_eq!(histogram.values().sum::<u64>(), 600);

    // Drained during partitioning; the source is spent afterwards.
    assert!(matches!(
        draws.count(),
        Err(StreamError::ExhaustedSource { .. })
    ));
    Ok(())
}

#[test]
fn exec_mode_selects_the_evaluation_path() -> Result<()> {
    let p = range(0..50).filter(|n: &i64| n % 5 == 0);
    let seq = p.collect_with(to_list(), &ExecMode::Sequential)?;
    let par = p.collect_with(to_list(), &ExecMode::Parallel(with(3)))?;
    assert_eq!(seq, par);
    assert_eq!(ExecMode::default(), ExecMode::Sequential);
    Ok(())
}

#[test]
fn zero_parallelism_is_rejected() {
    let res = range(0..3).collect_par_with(counting(), with(0));
    assert!(matches!(res, Err(StreamError::Config(_))));
}

#[test]
fn whole_stream_stages_are_rejected_in_parallel() -> Result<()> {
    let limited = range(0..100).limit(5);
    let skipped = range(0..100).skip(10);
    let sorted = from_vec(vec![5, 4, 3, 2, 1, 0]).sorted();
    assert_eq!(limited.count()?, 5);
    assert_eq!(skipped.count()?, 90);
    assert_eq!(sorted.to_vec()?, vec![0, 1, 2, 3, 4, 5]);

    let mut coordinator = Coordinator::new(with(4));
    for err in [
        coordinator.collect(&limited, counting()).unwrap_err(),
        coordinator.collect(&skipped, counting()).unwrap_err(),
    ] {
        assert!(matches!(err, StreamError::UnsupportedForParallel(_)), "{err}");
    }
    let err = coordinator.collect(&sorted, to_list()).unwrap_err();
    assert!(matches!(err, StreamError::UnsupportedForParallel(_)), "{err}");
    assert_eq!(coordinator.state(), CoordinatorState::Failed);
    assert_eq!(coordinator.metrics().chunks, 0);

    // Element-wise stages after the source are still fine.
    let evens = range(0..100).filter(|n: &i64| n % 2 == 0).map(|n: &i64| n * 3);
    assert_eq!(evens.count_par()?, 50);
    Ok(())
}

#[test]
fn oversized_parallelism_uses_one_worker_per_chunk() -> Result<()> {
    let mut coordinator = Coordinator::new(with(10_000));
    let n = coordinator.collect(&range(0..3), counting())?;
    assert_eq!(n, 3);
    assert_eq!(coordinator.metrics().chunks, 3);
    assert_eq!(coordinator.metrics().chunk_sizes, vec![1, 1, 1]);
    Ok(())
}

#[test]
fn panicking_stage_fails_its_chunk() -> Result<()> {
    // 4 chunks of 25: element 60 lives in chunk 2.
    let p = range(0..100).map(|n: &i64| {
        assert!(*n != 60, "cannot handle {n}");
        *n
    });
    let mut coordinator = Coordinator::new(with(4));
    let err = coordinator.collect(&p, counting()).unwrap_err();

    assert_eq!(err.chunk(), Some(2));
    match err.root() {
        StreamError::Panicked(msg) => assert!(msg.contains("cannot handle 60"), "{msg}"),
        other => panic!("expected a panic report, got {other}"),
    }
    assert_eq!(coordinator.state(), CoordinatorState::Failed);
    assert_eq!(coordinator.metrics().failed_chunk, Some(2));
    Ok(())
}
