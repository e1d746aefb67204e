use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::stream::{self, Stream, StreamExt};

/// Bounded worker pool for time-range sync jobs.
///
/// At most `concurrency` jobs run at once; the next queued job starts as soon
/// as one finishes. Submitting a new batch supersedes every earlier one: jobs
/// of an older batch that have not started yet are dropped when their turn
/// comes, jobs already running are left to finish.
#[derive(Debug, Clone)]
pub struct SyncPool {
    generation: Arc<AtomicU64>,
    concurrency: usize,
}

impl SyncPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Supersedes all pending jobs without queueing new ones.
    pub fn cancel(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Queues `jobs` as the new batch and returns the stream draining it.
    ///
    /// The stream yields the output of every job that actually ran, in
    /// completion order.
    pub fn submit<J, T, F, Fut>(
        &self,
        jobs: Vec<J>,
        run: F,
    ) -> impl Stream<Item = T> + Send + use<J, T, F, Fut>
    where
        J: Send + 'static,
        T: Send + 'static,
        F: Fn(J) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let batch = self.cancel();
        let current = Arc::clone(&self.generation);
        let total = jobs.len();

        log::debug!("Sync batch {batch}: {total} jobs, {} workers", self.concurrency);

        stream::iter(jobs)
            .map(move |job| {
                let live = current.load(Ordering::SeqCst) == batch;
                if !live {
                    log::debug!("Sync batch {batch} superseded, skipping queued job");
                }
                let task = live.then(|| run(job));
                async move {
                    match task {
                        Some(task) => Some(task.await),
                        None => None,
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(futures::future::ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn never_more_than_four_in_flight() {
        let pool = SyncPool::new(4);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results: Vec<usize> = pool
            .submit((0..11).collect(), {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                move |job: usize| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5 + (job as u64 % 3))).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        job
                    }
                }
            })
            .collect()
            .await;

        assert_eq!(results.len(), 11);
        assert_eq!(peak.load(Ordering::SeqCst), 4);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn new_batch_discards_queued_jobs_of_the_previous_one() {
        let pool = SyncPool::new(4);
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let runner = |batch: &'static str, log: Arc<Mutex<Vec<String>>>| {
            move |job: usize| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(format!("{batch}{job} start"));
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    job
                }
            }
        };

        let mut first = pool.submit((0..8).collect(), runner("a", Arc::clone(&log)));
        assert!(first.next().await.is_some());

        log.lock().unwrap().push("b submitted".to_string());
        let second = pool.submit((0..8).collect(), runner("b", Arc::clone(&log)));

        let first_rest: Vec<usize> = first.collect().await;
        let second_all: Vec<usize> = second.collect().await;

        // the three jobs already running still complete
        assert_eq!(first_rest.len(), 3);
        assert_eq!(second_all.len(), 8);

        let log = log.lock().unwrap();
        let marker = log.iter().position(|line| line == "b submitted").unwrap();
        assert_eq!(log.iter().filter(|line| line.starts_with('a')).count(), 4);
        assert!(log[marker..].iter().all(|line| !line.starts_with('a')));
    }

    #[tokio::test]
    async fn empty_batch_finishes_immediately() {
        let pool = SyncPool::new(4);
        let results: Vec<()> = pool.submit(Vec::<()>::new(), |_| async {}).collect().await;

        assert!(results.is_empty());
        assert_eq!(pool.generation(), 1);
    }
}
