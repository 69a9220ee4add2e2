//! Queue-driven worker integration tests.

use super::helpers::{CountingStore, clock, store};
use mockable::DefaultClock;
use palindromes::palindrome::{FinderError, ManacherFinder, PalindromeFinder, PalindromeSolution};
use palindromes::task::{
    adapters::memory::InMemoryTaskQueue,
    domain::{Task, TaskStatus},
    services::TaskProcessor,
};
use palindromes::worker::{TaskWorker, run_worker_pool};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Finder that fails a fixed number of times before succeeding.
struct FlakyFinder {
    failures_left: AtomicUsize,
}

impl PalindromeFinder for FlakyFinder {
    fn find(&self, text: &str) -> Result<PalindromeSolution, FinderError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FinderError::new("transient failure"));
        }
        ManacherFinder.find(text)
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_deliveries_across_workers_complete_each_task_once(
    store: Arc<CountingStore>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let queue = Arc::new(InMemoryTaskQueue::new());
    let mut ids = Vec::new();
    for text in ["abba", "rotor", "refer", "xyz"] {
        let task = store.seed(Task::submit(text, &clock)).await?;
        for _ in 0..3 {
            queue.publish(task.id().to_string())?;
        }
        ids.push(task.id());
    }
    queue.publish("garbage")?;
    queue.close();
    let processor = TaskProcessor::new(Arc::clone(&store), Arc::new(ManacherFinder), Arc::new(clock));

    let stats = run_worker_pool(TaskWorker::new(Arc::clone(&queue), processor), 4).await?;

    eyre::ensure!(stats.total() == 13, "unexpected stats {stats:?}");
    eyre::ensure!(stats.skipped == 1, "malformed trigger should be skipped");
    eyre::ensure!(stats.failed == 0, "no delivery should fail");
    for id in ids {
        let task = store.require(id).await?;
        eyre::ensure!(task.status() == TaskStatus::Completed, "task {id} incomplete");
    }
    let completions = store
        .saved_statuses()?
        .into_iter()
        .filter(|status| *status == TaskStatus::Completed)
        .count();
    eyre::ensure!(completions <= 4 * 3, "too many completing writes");
    eyre::ensure!(completions >= 4, "every task needs a completing write");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_delivery_is_retried_until_it_succeeds(
    store: Arc<CountingStore>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let queue = Arc::new(InMemoryTaskQueue::with_max_deliveries(3));
    let task = store.seed(Task::submit("kayak trip", &clock)).await?;
    queue.publish(task.id().to_string())?;
    queue.close();
    let finder = FlakyFinder {
        failures_left: AtomicUsize::new(2),
    };
    let processor = TaskProcessor::new(Arc::clone(&store), Arc::new(finder), Arc::new(clock));

    let stats = TaskWorker::new(Arc::clone(&queue), processor).run().await?;

    eyre::ensure!(stats.failed == 2, "unexpected stats {stats:?}");
    eyre::ensure!(stats.processed == 1, "unexpected stats {stats:?}");
    let stored = store.require(task.id()).await?;
    eyre::ensure!(stored.status() == TaskStatus::Completed, "task should complete");
    eyre::ensure!(
        stored.solution().map(PalindromeSolution::text) == Some("kayak"),
        "unexpected solution {:?}",
        stored.solution()
    );
    eyre::ensure!(
        store.saved_statuses()? == vec![TaskStatus::Started, TaskStatus::Completed],
        "start must be written once even across retries"
    );
    Ok(())
}
