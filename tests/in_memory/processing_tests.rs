//! In-memory integration tests for the task processor.

use super::helpers::{CountingStore, GatedFinder, clock, store};
use mockable::DefaultClock;
use palindromes::palindrome::ManacherFinder;
use palindromes::task::{
    domain::{Task, TaskId, TaskStatus},
    services::{ProcessOutcome, TaskProcessor},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[case("I am Anna", "Anna", 4)]
#[case("Madam Anna", "Madam", 5)]
#[case("Ma'am, I am Annabelle!", "Ma'am", 5)]
#[case("I am Madam Anna", " Madam ", 7)]
#[tokio::test(flavor = "multi_thread")]
async fn single_trigger_completes_submitted_task(
    store: Arc<CountingStore>,
    clock: DefaultClock,
    #[case] text: &str,
    #[case] palindrome: &str,
    #[case] length: usize,
) -> Result<(), eyre::Report> {
    let task = store.seed(Task::submit(text, &clock)).await?;
    let processor = TaskProcessor::new(
        Arc::clone(&store),
        Arc::new(ManacherFinder),
        Arc::new(clock),
    );

    let outcome = processor.process(task.id()).await?;

    let ProcessOutcome::Completed(completed) = outcome else {
        eyre::bail!("expected completed outcome, got {outcome:?}");
    };
    let solution = completed
        .solution()
        .ok_or_else(|| eyre::eyre!("completed task should carry a solution"))?;
    eyre::ensure!(solution.text() == palindrome, "unexpected palindrome {solution:?}");
    eyre::ensure!(solution.length() == length, "unexpected length {solution:?}");
    eyre::ensure!(
        store.saved_statuses()? == vec![TaskStatus::Started, TaskStatus::Completed],
        "expected one start write and one completing write"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_trigger_writes_nothing(
    store: Arc<CountingStore>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let task = store.seed(Task::submit("level up", &clock)).await?;
    let processor = TaskProcessor::new(
        Arc::clone(&store),
        Arc::new(ManacherFinder),
        Arc::new(clock),
    );

    processor.process(task.id()).await?;
    let first = store.require(task.id()).await?;
    let outcome = processor.process(task.id()).await?;

    eyre::ensure!(
        outcome == ProcessOutcome::Unchanged(TaskStatus::Completed),
        "unexpected outcome {outcome:?}"
    );
    eyre::ensure!(store.require(task.id()).await? == first, "task changed");
    eyre::ensure!(store.saved_statuses()?.len() == 2, "unexpected extra write");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_reported_missing(store: Arc<CountingStore>) -> Result<(), eyre::Report> {
    let processor = TaskProcessor::new(
        Arc::clone(&store),
        Arc::new(ManacherFinder),
        Arc::new(DefaultClock),
    );

    let outcome = processor.process(TaskId::new()).await?;

    eyre::ensure!(outcome == ProcessOutcome::NotFound, "unexpected {outcome:?}");
    eyre::ensure!(store.saved_statuses()?.is_empty(), "nothing should be written");
    Ok(())
}

/// Two invocations search the same task concurrently; the one that finishes
/// second must discard its result instead of overwriting the first.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_invocations_complete_the_task_exactly_once(
    store: Arc<CountingStore>,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let task = store.seed(Task::submit("noon at the racecar", &clock)).await?;
    let (finder, gates, mut entries) = GatedFinder::new(2);
    let processor = TaskProcessor::new(Arc::clone(&store), Arc::new(finder), Arc::new(clock));
    let [first_gate, second_gate] = <[_; 2]>::try_from(gates)
        .map_err(|_| eyre::eyre!("expected two gates"))?;

    let first = tokio::spawn({
        let invocation = processor.clone();
        let task_id = task.id();
        async move { invocation.process(task_id).await }
    });
    entries
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("first search should begin"))?;

    let second = tokio::spawn({
        let invocation = processor.clone();
        let task_id = task.id();
        async move { invocation.process(task_id).await }
    });
    entries
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("second search should begin"))?;

    second_gate.send(())?;
    let second_outcome = second.await??;
    first_gate.send(())?;
    let first_outcome = first.await??;

    let ProcessOutcome::Completed(completed) = second_outcome else {
        eyre::bail!("second invocation should complete, got {second_outcome:?}");
    };
    eyre::ensure!(
        first_outcome == ProcessOutcome::StaleResultDiscarded,
        "first invocation should discard its result, got {first_outcome:?}"
    );
    eyre::ensure!(
        store.saved_statuses()? == vec![TaskStatus::Started, TaskStatus::Completed],
        "expected exactly one start and one completion write"
    );
    eyre::ensure!(
        store.require(task.id()).await? == completed,
        "stored task should be the one completed by the second invocation"
    );
    Ok(())
}
