use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::tasks::{TaskPool, TaskPoolBuilder};

/// Bounded pool for independent simulation runs.
///
/// At most `max_concurrent` runs execute at once. Results always come back in
/// input order, whatever order the runs finish in.
pub struct RunPool {
    pool: TaskPool,
    max_concurrent: usize,
}

impl RunPool {
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        let pool = TaskPoolBuilder::new()
            .num_threads(max_concurrent)
            .thread_name("aquanexus-run".to_string())
            .build();
        Self {
            pool,
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Apply `f` to every item, `max_concurrent` at a time.
    ///
    /// Each worker pulls the next unclaimed index, so the bound holds even
    /// when the calling thread helps drive the scope.
    pub fn map<I, T, F>(&self, items: &[I], f: F) -> Vec<T>
    where
        I: Sync,
        T: Send + 'static,
        F: Fn(usize, &I) -> T + Sync,
    {
        let workers = self.max_concurrent.min(items.len());
        if workers <= 1 {
            return items.iter().enumerate().map(|(i, item)| f(i, item)).collect();
        }

        let next = AtomicUsize::new(0);
        let batches = self.pool.scope(|scope| {
            for _ in 0..workers {
                let next = &next;
                let f = &f;
                scope.spawn(async move {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(i) else {
                            break;
                        };
                        done.push((i, f(i, item)));
                    }
                    done
                });
            }
        });

        let mut indexed: Vec<(usize, T)> = batches.into_iter().flatten().collect();
        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, value)| value).collect()
    }
}
