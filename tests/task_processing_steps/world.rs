//! Shared world state for task processing BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use palindromes::palindrome::ManacherFinder;
use palindromes::task::{
    adapters::memory::InMemoryTaskStore,
    domain::TaskId,
    services::{ProcessOutcome, TaskProcessor, TaskProcessorError, TaskSubmissionService},
};
use rstest::fixture;

/// Processor type used by the BDD world.
pub type TestProcessor = TaskProcessor<InMemoryTaskStore, ManacherFinder, DefaultClock>;

/// Submission service type used by the BDD world.
pub type TestSubmissions = TaskSubmissionService<InMemoryTaskStore, DefaultClock>;

/// Scenario world for task processing behaviour tests.
pub struct TaskProcessingWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub submissions: TestSubmissions,
    pub processor: TestProcessor,
    pub task_id: Option<TaskId>,
    pub last_outcome: Option<Result<ProcessOutcome, TaskProcessorError>>,
}

impl TaskProcessingWorld {
    /// Creates a world with an empty store and no scenario task.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            submissions: TaskSubmissionService::new(Arc::clone(&store), Arc::clone(&clock)),
            processor: TaskProcessor::new(Arc::clone(&store), Arc::new(ManacherFinder), clock),
            store,
            task_id: None,
            last_outcome: None,
        }
    }

    /// Returns the scenario task identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been set up yet.
    pub fn require_task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task identifier in scenario world"))
    }
}

impl Default for TaskProcessingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskProcessingWorld {
    TaskProcessingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
