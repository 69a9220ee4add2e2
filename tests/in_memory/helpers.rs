//! Shared test helpers for in-memory integration tests.

use async_trait::async_trait;
use palindromes::palindrome::{FinderError, ManacherFinder, PalindromeFinder, PalindromeSolution};
use palindromes::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreResult},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, mpsc};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Provides a clock for task creation.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Provides a fresh counting store for each test.
#[fixture]
pub fn store() -> Arc<CountingStore> {
    Arc::new(CountingStore::default())
}

/// Task store that records the status of every task it saves.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryTaskStore,
    saved: Mutex<Vec<TaskStatus>>,
}

impl CountingStore {
    /// Stores `task` directly, bypassing the save counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the task.
    pub async fn seed(&self, task: Task) -> Result<Task, eyre::Report> {
        Ok(self.inner.save(task).await?)
    }

    /// Returns the statuses written through [`TaskStore::save`], in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter lock is poisoned.
    pub fn saved_statuses(&self) -> Result<Vec<TaskStatus>, eyre::Report> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .map_err(|err| eyre::eyre!("save counter poisoned: {err}"))
    }

    /// Reads a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or the task is missing.
    pub async fn require(&self, task_id: TaskId) -> Result<Task, eyre::Report> {
        self.inner
            .get(task_id)
            .await?
            .ok_or_else(|| eyre::eyre!("task {task_id} should exist"))
    }
}

#[async_trait]
impl TaskStore for CountingStore {
    async fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.inner.get(id).await
    }

    async fn save(&self, task: Task) -> TaskStoreResult<Task> {
        if let Ok(mut saved) = self.saved.lock() {
            saved.push(task.status());
        }
        self.inner.save(task).await
    }
}

/// Finder whose searches block until the test releases them.
///
/// The n-th search waits on the n-th gate and reports its entry on the
/// channel returned by [`GatedFinder::new`].
pub struct GatedFinder {
    gates: Mutex<VecDeque<mpsc::Receiver<()>>>,
    entered: UnboundedSender<String>,
}

impl GatedFinder {
    /// Creates a finder with `count` gates, returning the gate handles and
    /// the channel on which each search announces its text.
    #[must_use]
    pub fn new(count: usize) -> (Self, Vec<mpsc::Sender<()>>, UnboundedReceiver<String>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..count).map(|_| mpsc::channel()).unzip();
        let (entered, entries) = unbounded_channel();
        let finder = Self {
            gates: Mutex::new(receivers),
            entered,
        };
        (finder, senders, entries)
    }
}

impl PalindromeFinder for GatedFinder {
    fn find(&self, text: &str) -> Result<PalindromeSolution, FinderError> {
        let gate = self
            .gates
            .lock()
            .map_err(|err| FinderError::new(err.to_string()))?
            .pop_front();
        self.entered
            .send(text.to_owned())
            .map_err(|err| FinderError::new(err.to_string()))?;
        if let Some(release) = gate {
            release
                .recv()
                .map_err(|err| FinderError::new(err.to_string()))?;
        }
        ManacherFinder.find(text)
    }
}
