use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::PartitionError;

/// Environment variable naming the worker executable for the process pool.
pub const WORKER_ENV: &str = "PEAK_WORKER";

pub const WORKER_BINARY: &str = "peak-worker";

lazy_static! {
    static ref REGISTERED: Mutex<Option<WorkerCommand>> = Mutex::new(None);
}

/// How to start one process-pool worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Makes this command the one [`WorkerCommand::locate`] returns for the
    /// rest of the process. A binary that serves work items itself (through
    /// [`crate::worker::serve_stdio`]) registers its own executable here,
    /// since cargo never builds `peak-worker` for dependents of this crate.
    pub fn register(self) {
        if let Ok(mut registered) = REGISTERED.lock() {
            *registered = Some(self);
        }
    }

    /// Resolution order: a [registered](WorkerCommand::register) command,
    /// then `$PEAK_WORKER`, then `peak-worker` beside the running executable
    /// or one directory up (where cargo places binaries relative to test
    /// executables).
    pub fn locate() -> Result<Self, PartitionError> {
        if let Ok(registered) = REGISTERED.lock() {
            if let Some(command) = registered.as_ref() {
                return Ok(command.clone());
            }
        }
        if let Some(program) = env::var_os(WORKER_ENV) {
            return Ok(Self::new(program));
        }

        let not_found = PartitionError::WorkerNotFound {
            binary: WORKER_BINARY,
            env: WORKER_ENV,
        };
        let exe = match env::current_exe() {
            Ok(exe) => exe,
            Err(_) => return Err(not_found),
        };
        search_near(&exe).map(Self::new).ok_or(not_found)
    }
}

fn search_near(exe: &Path) -> Option<PathBuf> {
    let name = format!("{}{}", WORKER_BINARY, env::consts::EXE_SUFFIX);
    exe.ancestors()
        .skip(1)
        .take(2)
        .map(|dir| dir.join(&name))
        .find(|candidate| candidate.is_file())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pool {
    /// Scoped threads sharing the sequence by reference.
    Threads,
    /// One child process per chunk, each fed a copy of its chunk.
    Processes(WorkerCommand),
}

impl Pool {
    pub fn is_isolated(&self) -> bool {
        matches!(self, Pool::Processes(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pool::Threads => "threads",
            Pool::Processes(_) => "subprocesses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Requested worker count, normalized against the sequence length per call.
    pub workers: i64,
    pub pool: Pool,
    /// Only honored by the process pool; threads cannot be interrupted.
    pub deadline: Option<Duration>,
    /// Most worker processes alive at once. Further chunks wait for a slot.
    pub max_processes: usize,
}

impl PartitionConfig {
    pub fn new(workers: i64, pool: Pool) -> Self {
        Self {
            workers,
            pool,
            deadline: None,
            max_processes: *crate::DEFAULT_WORKERS,
        }
    }

    pub fn threads(workers: i64) -> Self {
        Self::new(workers, Pool::Threads)
    }

    pub fn processes(workers: i64, command: WorkerCommand) -> Self {
        Self::new(workers, Pool::Processes(command))
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_max_processes(mut self, max_processes: usize) -> Self {
        self.max_processes = max_processes;
        self
    }
}
