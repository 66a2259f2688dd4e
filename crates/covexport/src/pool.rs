//! Fixed-Size Worker Pool
//!
//! A bounded set of scoped OS threads draining a shared job queue. Workers
//! are started as jobs arrive, never more than the pool size and never
//! more than the number of jobs. Jobs may borrow from the caller's stack;
//! [`WorkerPool::run`] returns only after every submitted job has finished.

use std::cell::Cell;
use std::fmt;
use std::sync::{mpsc, Mutex};
use std::thread;

type Job<'env> = Box<dyn FnOnce() + Send + 'env>;

/// Number of hardware threads, at least 1
#[must_use]
pub fn available_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Handle used to submit jobs while a pool is running
pub struct TaskQueue<'pool, 'env> {
    sender: mpsc::Sender<Job<'env>>,
    spawn_worker: &'pool dyn Fn(),
    workers: Cell<usize>,
    max_workers: usize,
}

impl<'env> TaskQueue<'_, 'env> {
    /// Queue a job for the next idle worker
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'env,
    {
        // The receiver outlives the queue, so sending cannot fail.
        let _ = self.sender.send(Box::new(job));

        let workers = self.workers.get();
        if workers < self.max_workers {
            self.workers.set(workers + 1);
            (self.spawn_worker)();
        }
    }
}

impl fmt::Debug for TaskQueue<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("workers", &self.workers.get())
            .field("max_workers", &self.max_workers)
            .finish_non_exhaustive()
    }
}

/// Pool of at most a fixed number of worker threads
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    threads: usize,
}

impl WorkerPool {
    /// Create a pool with the given number of workers (at least 1)
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Let `submit` queue jobs, then wait for all of them
    ///
    /// If any job panics the panic is propagated once every worker has
    /// stopped.
    pub fn run<'env, F>(&self, submit: F)
    where
        F: for<'pool> FnOnce(&TaskQueue<'pool, 'env>),
    {
        let (sender, receiver) = mpsc::channel::<Job<'env>>();
        let receiver = Mutex::new(receiver);

        thread::scope(|scope| {
            let receiver = &receiver;
            let spawn_worker = || {
                scope.spawn(move || drain(receiver));
            };

            let queue = TaskQueue {
                sender,
                spawn_worker: &spawn_worker,
                workers: Cell::new(0),
                max_workers: self.threads,
            };
            submit(&queue);
            // Closing the channel lets idle workers exit once it drains.
            drop(queue);
        });
    }
}

/// Worker loop: run jobs until the queue is closed and empty
fn drain(receiver: &Mutex<mpsc::Receiver<Job<'_>>>) {
    loop {
        let job = match receiver.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => return,
        };
        match job {
            Ok(job) => job(),
            Err(_) => return,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn distinct_workers(threads: usize, jobs: usize) -> usize {
        let seen = Mutex::new(HashSet::new());
        WorkerPool::new(threads).run(|queue| {
            for _ in 0..jobs {
                queue.submit(|| {
                    std::thread::sleep(std::time::Duration::from_millis(2));
                    seen.lock().unwrap().insert(std::thread::current().id());
                });
            }
        });
        seen.into_inner().unwrap().len()
    }

    #[test]
    fn test_zero_threads_clamped() {
        let counter = AtomicUsize::new(0);
        WorkerPool::new(0).run(|queue| {
            queue.submit(|| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_workers_bounded_by_jobs() {
        // A huge pool over two jobs must not start a thread per slot.
        let workers = distinct_workers(100_000, 2);
        assert!((1..=2).contains(&workers));
    }

    #[test]
    fn test_workers_bounded_by_pool_size() {
        let workers = distinct_workers(3, 48);
        assert!((1..=3).contains(&workers));
    }

    #[test]
    fn test_available_threads_positive() {
        assert!(available_threads() >= 1);
    }

    #[test]
    fn test_runs_every_job() {
        let counter = AtomicUsize::new(0);
        WorkerPool::new(4).run(|queue| {
            for _ in 0..100 {
                queue.submit(|| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        });
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_jobs_borrow_caller_state() {
        let inputs: Vec<u64> = (1..=10).collect();
        let results = Mutex::new(Vec::new());
        WorkerPool::new(3).run(|queue| {
            for value in &inputs {
                let results = &results;
                queue.submit(move || results.lock().unwrap().push(value * value));
            }
        });

        let mut results = results.into_inner().unwrap();
        results.sort_unstable();
        assert_eq!(results, inputs.iter().map(|v| v * v).collect::<Vec<_>>());
    }

    #[test]
    fn test_more_threads_than_jobs() {
        let counter = AtomicUsize::new(0);
        WorkerPool::new(16).run(|queue| {
            queue.submit(|| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_jobs() {
        WorkerPool::new(2).run(|_| {});
    }

    #[test]
    #[should_panic]
    fn test_job_panic_propagates() {
        WorkerPool::new(2).run(|queue| {
            queue.submit(|| panic!("job failed"));
        });
    }
}
