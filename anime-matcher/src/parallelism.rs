//! Worker-pool selection for per-target matching.
//!
//! A configured thread count becomes a [`Parallelism`], which decides where
//! the per-target queries run. Only an explicit count above one builds a
//! pool of its own; the default borrows whatever rayon pool the caller is in.

use rayon::ThreadPoolBuildError;

/// Where per-target queries run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Match targets one after another on the calling thread.
    #[default]
    Sequential,
    /// Split targets across the rayon pool the call is already running in.
    ///
    /// Rayon decides how the work is shared out; no pool is built.
    Ambient,
    /// Build a pool with this many workers for the duration of the call.
    Dedicated(usize),
}

impl Parallelism {
    /// Strategy for a configured thread count.
    ///
    /// `0` selects [`Ambient`](Self::Ambient), `1` selects
    /// [`Sequential`](Self::Sequential) and any larger count a
    /// [`Dedicated`](Self::Dedicated) pool of that size.
    #[must_use]
    pub const fn from_threads(n_threads: usize) -> Self {
        match n_threads {
            0 => Self::Ambient,
            1 => Self::Sequential,
            n => Self::Dedicated(n),
        }
    }

    /// Fit the strategy to a batch of `n_targets`.
    ///
    /// Falls back to sequential matching unless at least two workers would
    /// each receive `min_per_worker` targets. A dedicated pool shrinks to
    /// the number of workers the batch keeps busy.
    #[must_use]
    pub fn for_workload(self, n_targets: usize, min_per_worker: usize) -> Self {
        let busy_workers = n_targets.checked_div(min_per_worker).unwrap_or(n_targets);
        match self {
            Self::Ambient if busy_workers > 1 && rayon::current_num_threads() > 1 => {
                Self::Ambient
            }
            Self::Dedicated(n) if busy_workers > 1 && n > 1 => {
                Self::Dedicated(n.min(busy_workers))
            }
            Self::Sequential | Self::Ambient | Self::Dedicated(_) => Self::Sequential,
        }
    }

    /// Returns `true` when targets are spread over more than one worker.
    #[must_use]
    pub const fn is_parallel(self) -> bool {
        match self {
            Self::Sequential => false,
            Self::Ambient => true,
            Self::Dedicated(n) => n > 1,
        }
    }

    /// Workers available to the strategy.
    #[must_use]
    pub fn workers(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Ambient => rayon::current_num_threads(),
            Self::Dedicated(n) => n.max(1),
        }
    }

    /// Run `op` where this strategy says matching should happen.
    ///
    /// # Errors
    /// Returns [`ThreadPoolBuildError`] when a dedicated pool cannot be
    /// created. The other strategies never fail.
    pub fn install<T, F>(self, op: F) -> Result<T, ThreadPoolBuildError>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match self {
            Self::Dedicated(n) if n > 1 => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                Ok(pool.install(op))
            }
            Self::Sequential | Self::Ambient | Self::Dedicated(_) => Ok(op()),
        }
    }
}
