//! Self-scheduling work distribution over a persistent thread pool.
//!
//! Every worker of the pool runs the same loop: claim the next item index
//! from a shared atomic counter, process it, repeat until the counter runs
//! past the end. Fast workers simply claim more items; there is no queue
//! and no lock. Each result lands in its own write-once slot, so results
//! come back in item order no matter which thread produced them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// A worker pool built once and reused for every frame.
pub struct TileScheduler {
    pool: ThreadPool,
}

impl TileScheduler {
    /// Build the pool. `threads == 0` uses one thread per available core.
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("glint-worker-{}", i))
            .build()?;
        log::debug!("Tile scheduler started with {} threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` once for every index in `0..count` across all pool
    /// threads and return the results in index order.
    pub fn run<T, F>(&self, count: usize, work: F) -> Vec<T>
    where
        T: Send + Sync,
        F: Fn(usize) -> T + Sync,
    {
        let next = AtomicUsize::new(0);
        let slots: Vec<OnceLock<T>> = (0..count).map(|_| OnceLock::new()).collect();

        self.pool.broadcast(|_| loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            if index >= count {
                break;
            }
            // each index is claimed exactly once, so the slot is still empty
            let _ = slots[index].set(work(index));
        });

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.into_inner()
                    .unwrap_or_else(|| unreachable!("work item {} was never claimed", index))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[test]
    fn test_results_come_back_in_order() {
        let scheduler = TileScheduler::new(4).unwrap();
        let results = scheduler.run(1000, |i| i * 2);
        assert_eq!(results, (0..1000).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_item_runs_once() {
        let scheduler = TileScheduler::new(3).unwrap();
        let seen = Mutex::new(Vec::new());
        scheduler.run(257, |i| seen.lock().unwrap().push(i));

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 257);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 257);
    }

    #[test]
    fn test_work_spreads_over_pool_threads() {
        let scheduler = TileScheduler::new(2).unwrap();
        assert_eq!(scheduler.thread_count(), 2);

        let names = scheduler.run(64, |_| {
            std::thread::current().name().unwrap_or_default().to_string()
        });
        assert!(names.iter().all(|n| n.starts_with("glint-worker-")));
    }

    #[test]
    fn test_no_items() {
        let scheduler = TileScheduler::new(2).unwrap();
        let results: Vec<u32> = scheduler.run(0, |_| unreachable!());
        assert!(results.is_empty());
    }

    #[test]
    fn test_pool_is_reused() {
        let scheduler = TileScheduler::new(2).unwrap();
        for round in 0..5 {
            let results = scheduler.run(10, |i| i + round);
            assert_eq!(results[9], 9 + round);
        }
    }
}
