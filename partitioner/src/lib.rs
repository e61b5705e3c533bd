//! Splits a mountain-shaped sequence into contiguous chunks, searches every
//! chunk concurrently with [`peakfinder`] and keeps the largest result.
//!
//! The true peak lies in exactly one chunk. Every other chunk is monotone and
//! reports one of its own boundaries, which can never exceed the peak, so the
//! maximum over the chunk results is the maximum of the whole sequence.

#[macro_use]
extern crate slog_logger;
#[macro_use]
extern crate lazy_static;
extern crate num_cpus;

mod chunk;
mod config;
mod error;
pub mod frame;
mod process;
mod thread;
pub mod worker;

pub use chunk::{chunks, normalize_workers, Chunk};
pub use config::{PartitionConfig, Pool, WorkerCommand, WORKER_BINARY, WORKER_ENV};
pub use error::PartitionError;

lazy_static! {
    /// One worker per physical core.
    pub static ref DEFAULT_WORKERS: usize = num_cpus::get_physical();
}

pub struct Partitioner {
    config: PartitionConfig,
}

impl Partitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Blocks until every chunk has been searched, then reduces by maximum.
    pub fn find_max(&self, sequence: &[i32]) -> Result<i32, PartitionError> {
        if sequence.is_empty() {
            return Err(PartitionError::EmptySequence);
        }

        let workers = normalize_workers(self.config.workers, sequence.len());
        if workers as i64 != self.config.workers {
            info!(
                "Requested {} workers for {} elements, using {}",
                self.config.workers,
                sequence.len(),
                workers
            );
        }
        let chunks = chunks(sequence.len(), workers);
        info!(
            "Dispatching {} chunks of about {} elements to {}",
            chunks.len(),
            sequence.len() / workers,
            self.config.pool.name()
        );

        let results = match &self.config.pool {
            Pool::Threads => thread::search(sequence, &chunks),
            Pool::Processes(command) => process::search(
                sequence,
                &chunks,
                command,
                self.config.deadline,
                self.config.max_processes,
            ),
        };
        let results = match results {
            Ok(results) => results,
            Err(err) => {
                error!("Concurrent search on {} failed: {}", self.config.pool.name(), err);
                return Err(err);
            }
        };

        results
            .into_iter()
            .max()
            .ok_or(PartitionError::EmptySequence)
    }
}

/// Searches `sequence` with `worker_count` threads, or with as many
/// `peak-worker` processes when `use_isolated_processes` is set.
///
/// Worker counts that are non-positive or larger than the sequence fall back
/// to a single worker. At most [`DEFAULT_WORKERS`] processes run at once.
///
/// The process pool runs whatever [`WorkerCommand::locate`] finds. Cargo only
/// builds `peak-worker` for this crate's own tests and installs, so a
/// dependent binary must either [register](WorkerCommand::register) a command
/// that serves work items or point `$PEAK_WORKER` at one; otherwise the call
/// fails with [`PartitionError::WorkerNotFound`].
pub fn find_max_concurrent(
    sequence: &[i32],
    worker_count: i64,
    use_isolated_processes: bool,
) -> Result<i32, PartitionError> {
    if sequence.is_empty() {
        return Err(PartitionError::EmptySequence);
    }
    let pool = if use_isolated_processes {
        Pool::Processes(WorkerCommand::locate()?)
    } else {
        Pool::Threads
    };
    Partitioner::new(PartitionConfig::new(worker_count, pool)).find_max(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staggered(size: usize, peak: usize) -> Vec<i32> {
        (0..size)
            .map(|i| {
                if i <= peak {
                    i as i32
                } else {
                    peak as i32 - (i - peak) as i32
                }
            })
            .collect()
    }

    #[test]
    fn test_threads_match_sequential() {
        let heights = staggered(10000, 5023);
        let sequential = peakfinder::find_max(&heights, 0, heights.len() - 1).unwrap();
        for workers in [-2, 0, 1, 2, 3, 7, 16, 10001] {
            let res = find_max_concurrent(&heights, workers, false).unwrap();
            assert_eq!(sequential, res, "workers {}", workers);
        }
    }

    #[test]
    fn test_threads_peak_on_chunk_boundary() {
        // With 4 workers over 100 elements the chunks start at 0, 25, 50, 75.
        for peak in [0, 24, 25, 49, 50, 75, 99] {
            let heights = staggered(100, peak);
            let res = find_max_concurrent(&heights, 4, false).unwrap();
            assert_eq!(peak as i32, res, "peak {}", peak);
        }
    }

    #[test]
    fn test_known_mountains() {
        let heights = [8, 10, 20, 80, 100, 200, 400, 500, 3000, 2, 1];
        assert_eq!(3000, find_max_concurrent(&heights, 3, false).unwrap());
        let heights = [1, 3, 50, 10, 9, 7, 6];
        assert_eq!(50, find_max_concurrent(&heights, 7, false).unwrap());
    }

    #[test]
    fn test_one_worker_per_element() {
        let heights = staggered(50, 31);
        assert_eq!(31, find_max_concurrent(&heights, 50, false).unwrap());
    }

    #[test]
    fn test_empty_sequence() {
        let res = find_max_concurrent(&[], 4, false);
        assert!(matches!(res, Err(PartitionError::EmptySequence)));
        let res = Partitioner::new(PartitionConfig::threads(2)).find_max(&[]);
        assert!(matches!(res, Err(PartitionError::EmptySequence)));
    }

    #[test]
    fn test_default_workers() {
        assert!(*DEFAULT_WORKERS >= 1);
    }
}
