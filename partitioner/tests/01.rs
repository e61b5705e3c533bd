use std::time::{Duration, Instant};

use partitioner::{PartitionConfig, PartitionError, Partitioner, WorkerCommand};

fn staggered(size: usize, peak: usize) -> Vec<i32> {
    let mut heights: Vec<i32> = (0..size as i32).collect();
    let mut value = peak as i32 - 1;
    for slot in heights.iter_mut().skip(peak + 1) {
        *slot = value;
        value -= 1;
    }
    heights
}

fn peak_worker() -> WorkerCommand {
    WorkerCommand::new(env!("CARGO_BIN_EXE_peak-worker"))
}

#[test]
fn test_processes_match_threads() {
    let heights = staggered(10000, 5023);
    let sequential = peakfinder::find_max(&heights, 0, heights.len() - 1).unwrap();
    assert_eq!(5023, sequential);

    for workers in [1, 2, 3, 8] {
        let threads = Partitioner::new(PartitionConfig::threads(workers))
            .find_max(&heights)
            .unwrap();
        let processes = Partitioner::new(PartitionConfig::processes(workers, peak_worker()))
            .find_max(&heights)
            .unwrap();
        assert_eq!(sequential, threads);
        assert_eq!(sequential, processes);
    }
}

#[test]
fn test_find_max_concurrent_locates_worker() {
    let heights = [8, 10, 20, 80, 100, 200, 400, 500, 3000, 2, 1];
    assert_eq!(3000, partitioner::find_max_concurrent(&heights, 3, true).unwrap());
    assert_eq!(3000, partitioner::find_max_concurrent(&heights, 0, true).unwrap());
    assert_eq!(3000, partitioner::find_max_concurrent(&heights, 3, false).unwrap());
}

#[test]
fn test_processes_peak_at_edges() {
    for peak in [0, 499, 500, 999] {
        let heights = staggered(1000, peak);
        let res = Partitioner::new(PartitionConfig::processes(4, peak_worker()))
            .find_max(&heights)
            .unwrap();
        assert_eq!(peak as i32, res);
    }
}

#[test]
fn test_many_chunks_share_few_processes() {
    let heights = staggered(1000, 613);
    for limit in [1, 8] {
        let config = PartitionConfig::processes(1000, peak_worker()).with_max_processes(limit);
        assert_eq!(613, Partitioner::new(config).find_max(&heights).unwrap());
    }

    let config = PartitionConfig::processes(1000, peak_worker());
    assert_eq!(613, Partitioner::new(config).find_max(&heights).unwrap());
}

#[test]
fn test_processes_carry_large_values() {
    // Shifted far from zero so the worker sees ten-digit heights.
    let size = 3_000_000;
    let peak = 2_100_000;
    let heights: Vec<i32> = staggered(size, peak)
        .into_iter()
        .map(|h| h - 2_000_000_000)
        .collect();
    let expected = peak as i32 - 2_000_000_000;

    for workers in [1, 2] {
        let res = Partitioner::new(PartitionConfig::processes(workers, peak_worker()))
            .find_max(&heights)
            .unwrap();
        assert_eq!(expected, res);
    }
}

#[cfg(unix)]
#[test]
fn test_failing_worker_fails_call() {
    let heights = staggered(100, 40);
    let res = Partitioner::new(PartitionConfig::processes(4, WorkerCommand::new("false")))
        .find_max(&heights);
    assert!(matches!(res, Err(PartitionError::WorkerExited { .. })));

    let config = PartitionConfig::processes(100, WorkerCommand::new("false")).with_max_processes(2);
    let res = Partitioner::new(config).find_max(&heights);
    assert!(matches!(res, Err(PartitionError::WorkerExited { .. })));
}

#[cfg(unix)]
#[test]
fn test_silent_worker_is_protocol_error() {
    let heights = staggered(100, 40);
    let res = Partitioner::new(PartitionConfig::processes(2, WorkerCommand::new("true")))
        .find_max(&heights);
    // `true` may exit before reading its request.
    assert!(matches!(
        res,
        Err(PartitionError::Protocol { .. }) | Err(PartitionError::Io { .. })
    ));
}

#[test]
fn test_missing_worker_fails_to_spawn() {
    let heights = staggered(100, 40);
    let command = WorkerCommand::new("/nonexistent/peak-worker-for-tests");
    let res = Partitioner::new(PartitionConfig::processes(2, command)).find_max(&heights);
    assert!(matches!(res, Err(PartitionError::Spawn { .. })));
}

#[cfg(unix)]
#[test]
fn test_deadline_kills_slow_workers() {
    let heights = staggered(100, 40);
    let command = WorkerCommand::new("sh").arg("-c").arg("sleep 30");
    let config = PartitionConfig::processes(2, command).with_deadline(Duration::from_millis(200));

    let begin = Instant::now();
    let res = Partitioner::new(config).find_max(&heights);
    assert!(matches!(res, Err(PartitionError::DeadlineExceeded(_))));
    assert!(begin.elapsed() < Duration::from_secs(20));
}
