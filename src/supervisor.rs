// Task supervision and graceful shutdown
// Runs registered tasks concurrently, cancels them on a termination signal
// and waits a bounded grace period for them to finish

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::signal;

/// A supervised, cancellable unit of long-running work
///
/// `run` should return when the work is done, when it fails irrecoverably,
/// or when `ctx` signals cancellation, whichever comes first.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Stable, human-readable task name used in logs and error reports
    fn name(&self) -> &str;

    async fn run(&self, ctx: CancellationToken) -> Result<()>;
}

/// One task's terminal error, tagged with the task name
#[derive(Debug)]
pub struct TaskFailure {
    pub name: String,
    pub error: anyhow::Error,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}

/// Aggregated outcome of a shutdown
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// One or more tasks returned an error before the grace period ended.
    /// Every collected failure is preserved, not just the first.
    #[error("{}", format_failures(.0))]
    TaskFailures(Vec<TaskFailure>),
}

fn format_failures(failures: &[TaskFailure]) -> String {
    let list = failures
        .iter()
        .map(TaskFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} task(s) failed: {}", failures.len(), list)
}

/// Runs [`Task`]s concurrently against a shared cancellation token
///
/// Tasks start as soon as they are added. [`Supervisor::wait`] blocks until
/// the process receives a termination signal, cancels the shared token once,
/// then drains task completions until the grace period elapses. The grace
/// period is soft: tasks still running when it expires are abandoned and
/// any error they would later return is not reported.
pub struct Supervisor {
    token: CancellationToken,
    tasks: JoinSet<(String, Result<()>)>,
    grace: Duration,
}

impl Supervisor {
    pub fn new(grace: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: JoinSet::new(),
            grace,
        }
    }

    /// Register a task and start running it immediately
    pub fn add_task(&mut self, task: Arc<dyn Task>) {
        let ctx = self.token.child_token();
        self.tasks.spawn(async move {
            let name = task.name().to_string();
            tracing::debug!(task = %name, "task started");
            let result = task.run(ctx).await;
            (name, result)
        });
    }

    /// Block until an OS termination signal arrives, then shut down
    pub async fn wait(self) -> Result<(), SupervisorError> {
        self.wait_with_shutdown(signal::wait_for_shutdown_signal())
            .await
    }

    /// Same as [`Supervisor::wait`], with an injected shutdown trigger
    pub async fn wait_with_shutdown<F>(self, shutdown: F) -> Result<(), SupervisorError>
    where
        F: Future<Output = ()>,
    {
        shutdown.await;
        tracing::info!("shutdown requested, cancelling tasks");
        self.token.cancel();

        let mut tasks = self.tasks;
        let deadline = Instant::now() + self.grace;
        let mut failures = Vec::new();

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                // All tasks accounted for
                Ok(None) => break,
                Ok(Some(Ok((name, Ok(()))))) => {
                    tracing::debug!(task = %name, "task finished");
                }
                Ok(Some(Ok((name, Err(error))))) => {
                    tracing::error!(task = %name, %error, "task failed");
                    failures.push(TaskFailure { name, error });
                }
                Ok(Some(Err(join_error))) => {
                    tracing::error!(%join_error, "task panicked");
                    failures.push(TaskFailure {
                        name: "unknown".to_string(),
                        error: join_error.into(),
                    });
                }
                Err(_) => {
                    tracing::warn!(
                        remaining = tasks.len(),
                        "grace period elapsed with tasks still running"
                    );
                    break;
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SupervisorError::TaskFailures(failures))
        }
    }
}
