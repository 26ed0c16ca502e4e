//! Rayon pool sizing for the team-impact scan.

use rayon::ThreadPoolBuilder;
use tracing::warn;

/// How many threads scan candidates run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Thread count. 0 means the global Rayon pool (one thread per core).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run `f` on a pool of [workers](WorkerPool::workers) threads. Falls back to the global
    /// pool when `workers` is 0 or a dedicated pool cannot be built.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                warn!(workers = self.workers, error = %err, "worker pool unavailable, using global pool");
                f()
            }
        }
    }
}
