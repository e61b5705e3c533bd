use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use peakfinder::PeakError;
use thiserror::Error;

use crate::frame::FrameError;

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("cannot partition an empty sequence")]
    EmptySequence,

    #[error("search over chunk {chunk} failed")]
    Search {
        chunk: usize,
        #[source]
        source: PeakError,
    },

    #[error("worker for chunk {chunk} panicked")]
    WorkerPanicked { chunk: usize },

    #[error("no {binary} executable found, set {env} to its path")]
    WorkerNotFound {
        binary: &'static str,
        env: &'static str,
    },

    #[error("failed to start the process pool runtime")]
    Runtime(#[source] io::Error),

    #[error("failed to spawn worker for chunk {chunk}")]
    Spawn {
        chunk: usize,
        #[source]
        source: io::Error,
    },

    #[error("I/O with worker for chunk {chunk} failed")]
    Io {
        chunk: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker for chunk {chunk} exited with {status}")]
    WorkerExited { chunk: usize, status: ExitStatus },

    #[error("worker for chunk {chunk} failed: {reason}")]
    WorkerFailed { chunk: usize, reason: String },

    #[error("bad frame from worker for chunk {chunk}")]
    Protocol {
        chunk: usize,
        #[source]
        source: FrameError,
    },

    #[error("worker for chunk {expected} answered for chunk {actual}")]
    MismatchedReply { expected: usize, actual: usize },

    #[error("workers did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}
