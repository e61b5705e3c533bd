use crossbeam;
use peakfinder::PeakError;

use crate::chunk::Chunk;
use crate::error::PartitionError;

pub(crate) fn search(sequence: &[i32], chunks: &[Chunk]) -> Result<Vec<i32>, PartitionError> {
    search_with(sequence, chunks, |sequence, chunk| {
        peakfinder::find_max(sequence, chunk.left, chunk.right)
    })
}

/// Runs `find` for every chunk on its own scoped thread. Every thread is
/// joined before the first failure, in chunk order, is returned.
pub(crate) fn search_with<F>(
    sequence: &[i32],
    chunks: &[Chunk],
    find: F,
) -> Result<Vec<i32>, PartitionError>
where
    F: Fn(&[i32], Chunk) -> Result<i32, PeakError> + Sync,
{
    let find = &find;
    let joined = crossbeam::scope(|task| {
        let handles: Vec<_> = chunks
            .iter()
            .map(|&chunk| task.spawn(move |_| find(sequence, chunk)))
            .collect();

        handles
            .into_iter()
            .zip(chunks)
            .map(|(handle, chunk)| match handle.join() {
                Ok(res) => res.map_err(|source| PartitionError::Search {
                    chunk: chunk.index,
                    source,
                }),
                Err(_) => Err(PartitionError::WorkerPanicked { chunk: chunk.index }),
            })
            .collect::<Vec<_>>()
    });

    match joined {
        Ok(results) => results.into_iter().collect(),
        // Only reachable if a handle escaped the join above.
        Err(_) => Err(PartitionError::WorkerPanicked { chunk: 0 }),
    }
}
