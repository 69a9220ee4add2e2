//! Submits one palindrome task per stdin line and prints each task's final
//! status as a JSON line on stdout.
//!
//! Usage:
//!
//! ```text
//! palindromes [config-path] < input.txt
//! ```
//!
//! The optional `config-path` names a JSON [`ServiceConfig`] document. Every
//! submitted task is published to an in-memory trigger queue and processed by
//! a pool of workers; once the queue drains, the status of each task is
//! written in submission order:
//!
//! ```text
//! {"id":"…","status":"completed","timestamps":{…},"problem":{"text":"I am Anna"},"solution":{"length":4,"text":"Anna"}}
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use mockable::DefaultClock;
use palindromes::config::{ConfigError, ServiceConfig};
use palindromes::palindrome::ManacherFinder;
use palindromes::task::adapters::memory::{InMemoryTaskQueue, InMemoryTaskStore};
use palindromes::task::domain::TaskId;
use palindromes::task::services::{TaskProcessor, TaskSubmissionError, TaskSubmissionService};
use palindromes::telemetry::{TelemetryError, init_tracing};
use palindromes::worker::{TaskWorker, WorkerError, run_worker_pool};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running the service.
#[derive(Debug, Error)]
enum ServiceError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    #[error("failed to encode task status: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Submission(#[from] TaskSubmissionError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

fn collect_args() -> Result<Vec<Utf8PathBuf>, ServiceError> {
    env::args_os()
        .skip(1)
        .map(|arg_os| {
            let arg = arg_os
                .into_string()
                .map_err(|_| ServiceError::InvalidArgs("argument is not valid UTF-8".into()))?;
            Ok(Utf8PathBuf::from(arg))
        })
        .collect()
}

fn parse_args(args: Vec<Utf8PathBuf>) -> Result<Option<Utf8PathBuf>, ServiceError> {
    let mut remaining = args.into_iter();
    let config_path = remaining.next();
    if let Some(extra) = remaining.next() {
        return Err(ServiceError::InvalidArgs(format!(
            "unexpected argument '{extra}'; expected at most a config path"
        )));
    }
    Ok(config_path)
}

fn load_config(path: Option<&Utf8Path>) -> Result<ServiceConfig, ServiceError> {
    path.map_or_else(
        || Ok(ServiceConfig::default()),
        |config_path| ServiceConfig::load(config_path).map_err(ServiceError::from),
    )
}

fn read_problems() -> Result<Vec<String>, ServiceError> {
    io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(ServiceError::Input)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, ServiceError> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ServiceError::RuntimeInit)
}

async fn run(config: &ServiceConfig, problems: Vec<String>) -> Result<(), ServiceError> {
    let store = Arc::new(InMemoryTaskStore::new());
    let queue = Arc::new(InMemoryTaskQueue::with_max_deliveries(config.max_deliveries));
    let clock = Arc::new(DefaultClock);

    let submissions = TaskSubmissionService::new(Arc::clone(&store), Arc::clone(&clock))
        .with_sink(Arc::clone(&queue) as _);
    let processor = TaskProcessor::new(Arc::clone(&store), Arc::new(ManacherFinder), clock);
    let pool = tokio::spawn(run_worker_pool(
        TaskWorker::new(Arc::clone(&queue), processor),
        config.worker_count,
    ));

    let mut submitted: Vec<TaskId> = Vec::with_capacity(problems.len());
    for text in problems {
        submitted.push(submissions.submit(text).await?.id());
    }
    queue.close();

    let stats = pool
        .await
        .map_err(|err| ServiceError::Worker(WorkerError::from(err)))??;
    info!(
        processed = stats.processed,
        failed = stats.failed,
        skipped = stats.skipped,
        "all triggers handled"
    );

    let mut lines = Vec::with_capacity(submitted.len());
    for task_id in submitted {
        let output = submissions.status(&task_id.to_string()).await?;
        lines.push(serde_json::to_string(&output)?);
    }

    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").map_err(ServiceError::Output)?;
    }
    stdout.flush().map_err(ServiceError::Output)
}

fn main() -> Result<(), BoxError> {
    let config_path = parse_args(collect_args()?)?;
    let config = load_config(config_path.as_deref())?;
    init_tracing(&config).map_err(ServiceError::from)?;
    let problems = read_problems()?;
    let runtime = build_runtime()?;
    runtime.block_on(run(&config, problems)).map_err(Into::into)
}
