//! A scoped thread pool for the per-frame parallel stages.
//!
//! Work is spawned with `std::thread::scope`, so jobs may borrow frame data
//! and every job has finished when a call returns. A pool of one thread runs
//! everything inline on the caller, which keeps tests deterministic and
//! cheap.

use std::ops::Range;

#[derive(Debug, Clone, Copy)]
pub struct ThreadPool {
    num_threads: usize,
}

impl ThreadPool {
    /// Creates a new thread pool with the given number of worker threads.
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
        }
    }

    /// Creates a thread pool sized to the number of available CPU cores.
    pub fn default_threads() -> Self {
        Self::new(std::thread::available_parallelism().map_or(1, |n| n.get()))
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Evaluates `f` for every index in `0..len` and returns the results in
    /// index order. The range is split into one contiguous chunk per thread.
    pub fn map_range<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if self.num_threads == 1 || len < 2 {
            return (0..len).map(f).collect();
        }

        let chunks = split_range(len, self.num_threads);
        let mut results = Vec::with_capacity(len);
        std::thread::scope(|s| {
            let f = &f;
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|range| s.spawn(move || range.map(f).collect::<Vec<T>>()))
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(part) => results.extend(part),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });
        results
    }

    /// Runs `f` once per job, one job per scoped thread. Each job is moved
    /// into its worker, so jobs can carry disjoint `&mut` borrows.
    pub fn for_each<J, F>(&self, jobs: Vec<J>, f: F)
    where
        J: Send,
        F: Fn(J) + Sync,
    {
        if self.num_threads == 1 || jobs.len() < 2 {
            jobs.into_iter().for_each(f);
            return;
        }

        std::thread::scope(|s| {
            let f = &f;
            for job in jobs {
                s.spawn(move || f(job));
            }
        });
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::default_threads()
    }
}

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges.
fn split_range(len: usize, parts: usize) -> Vec<Range<usize>> {
    let chunk = len.div_ceil(parts.max(1)).max(1);
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}
