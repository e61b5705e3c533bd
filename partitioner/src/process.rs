use std::io;
use std::process::Stdio;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime;

use crate::chunk::Chunk;
use crate::config::WorkerCommand;
use crate::error::PartitionError;
use crate::frame::{self, WorkItem, WorkerReply};

/// Runs one worker process per chunk on a runtime that lives only for this
/// call, with at most `max_processes` children alive at once. On the first
/// failure the running children are killed as their futures are dropped and
/// the waiting chunks are never spawned.
pub(crate) fn search(
    sequence: &[i32],
    chunks: &[Chunk],
    command: &WorkerCommand,
    deadline: Option<Duration>,
    max_processes: usize,
) -> Result<Vec<i32>, PartitionError> {
    let rt = runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PartitionError::Runtime)?;

    // Chunks are copied lazily so only running workers hold their values.
    let workers = stream::iter(chunks.iter().map(|chunk| {
        let item = WorkItem {
            chunk: chunk.index,
            offset: chunk.left,
            values: chunk.slice(sequence).to_vec(),
        };
        run_worker(command, item)
    }));
    let all = workers
        .buffer_unordered(concurrency(max_processes, chunks.len()))
        .try_collect::<Vec<i32>>();

    rt.block_on(async move {
        match deadline {
            Some(limit) => match tokio::time::timeout(limit, all).await {
                Ok(res) => res,
                Err(_) => Err(PartitionError::DeadlineExceeded(limit)),
            },
            None => all.await,
        }
    })
}

fn concurrency(max_processes: usize, chunks: usize) -> usize {
    max_processes.min(chunks).max(1)
}

async fn run_worker(command: &WorkerCommand, item: WorkItem) -> Result<i32, PartitionError> {
    let chunk = item.chunk;
    let request = frame::encode_work_item(&item).map_err(|source| PartitionError::Protocol {
        chunk,
        source,
    })?;
    drop(item);

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| PartitionError::Spawn { chunk, source })?;

    let sent = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(&request).await,
        None => Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "worker stdin is not piped",
        )),
    };

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| PartitionError::Io { chunk, source })?;
    if !output.status.success() {
        return Err(PartitionError::WorkerExited {
            chunk,
            status: output.status,
        });
    }
    sent.map_err(|source| PartitionError::Io { chunk, source })?;

    let reply = frame::decode_frame::<WorkerReply>(&output.stdout)
        .map_err(|source| PartitionError::Protocol { chunk, source })?;
    match reply {
        WorkerReply::Max {
            chunk: actual,
            value,
            ..
        } if actual == chunk => Ok(value),
        WorkerReply::Max { chunk: actual, .. } => Err(PartitionError::MismatchedReply {
            expected: chunk,
            actual,
        }),
        WorkerReply::Failed { reason, .. } => Err(PartitionError::WorkerFailed { chunk, reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_bounds() {
        assert_eq!(4, concurrency(4, 1000));
        assert_eq!(3, concurrency(16, 3));
        assert_eq!(1, concurrency(0, 1000));
        assert_eq!(1, concurrency(8, 0));
    }
}
