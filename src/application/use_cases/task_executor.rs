use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::application::use_cases::clean_repositories::CleanError;
use crate::application::use_cases::switch_branch::SwitchError;
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::entities::run_config::RunConfig;
use crate::infrastructure::git::GitError;

/// Failure of one task against one repository
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Switch(#[from] SwitchError),

    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("task did not complete: {0}")]
    Incomplete(String),
}

/// One unit of work applied to every repository.
///
/// Implementations only touch the repository they are given, so the executor
/// may run them concurrently on distinct repositories.
#[async_trait]
pub trait RepositoryTask: Send + Sync {
    type Output: Send + 'static;

    async fn run(&self, repo: &RepositoryRef) -> Result<Self::Output, TaskError>;
}

/// Per-repository outcome of one task
#[derive(Debug)]
pub struct OperationResult<T = String> {
    pub repository: RepositoryRef,
    pub outcome: Result<T, TaskError>,
}

impl<T> OperationResult<T> {
    pub fn new(repository: RepositoryRef, outcome: Result<T, TaskError>) -> Self {
        Self {
            repository,
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TaskError> {
        self.outcome.as_ref().err()
    }
}

/// Success/failure tally over a result list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ExecutionSummary {
    pub fn from_results<T>(results: &[OperationResult<T>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Called once per finished repository, from whichever worker finished it
pub type CompletionObserver = Arc<dyn Fn(&RepositoryRef, bool) + Send + Sync>;

/// Runs a [`RepositoryTask`] over a repository list, one by one or on a
/// fixed-size worker pool. Either way every input repository yields exactly
/// one result.
#[derive(Clone)]
pub struct TaskExecutor {
    parallel: bool,
    workers: usize,
    observer: Option<CompletionObserver>,
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::sequential()
    }
}

impl TaskExecutor {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            workers: 1,
            observer: None,
        }
    }

    pub fn parallel(workers: usize) -> Self {
        Self {
            parallel: true,
            workers: workers.max(1),
            observer: None,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        if config.parallel {
            Self::parallel(config.workers)
        } else {
            Self::sequential()
        }
    }

    pub fn with_observer(mut self, observer: CompletionObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn workers(&self) -> usize {
        if self.parallel {
            self.workers
        } else {
            1
        }
    }

    /// Apply `task` to every repository.
    ///
    /// Sequential mode returns results in input order. Parallel mode returns
    /// them sorted by repository path.
    pub async fn run_all<T>(
        &self,
        repos: &[RepositoryRef],
        task: Arc<T>,
    ) -> Vec<OperationResult<T::Output>>
    where
        T: RepositoryTask + 'static,
    {
        if self.parallel {
            self.run_parallel(repos, task).await
        } else {
            self.run_sequential(repos, task.as_ref()).await
        }
    }

    async fn run_sequential<T: RepositoryTask>(
        &self,
        repos: &[RepositoryRef],
        task: &T,
    ) -> Vec<OperationResult<T::Output>> {
        let mut results = Vec::with_capacity(repos.len());
        for repo in repos {
            let result = OperationResult::new(repo.clone(), task.run(repo).await);
            self.notify(&result);
            results.push(result);
        }
        results
    }

    async fn run_parallel<T>(
        &self,
        repos: &[RepositoryRef],
        task: Arc<T>,
    ) -> Vec<OperationResult<T::Output>>
    where
        T: RepositoryTask + 'static,
    {
        if repos.is_empty() {
            return Vec::new();
        }

        let worker_count = self.workers.min(repos.len()).max(1);
        debug!(workers = worker_count, repositories = repos.len(), "starting worker pool");

        // Queue is filled up front and closed, so workers stop once it drains
        let (job_tx, job_rx) = mpsc::channel::<RepositoryRef>(repos.len());
        for repo in repos {
            if job_tx.send(repo.clone()).await.is_err() {
                break;
            }
        }
        drop(job_tx);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<OperationResult<T::Output>>();

        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let job_rx = Arc::clone(&job_rx);
                let result_tx = result_tx.clone();
                let task = Arc::clone(&task);
                let observer = self.observer.clone();

                tokio::spawn(async move {
                    loop {
                        let next = job_rx.lock().await.recv().await;
                        let Some(repo) = next else { break };

                        debug!(worker_id, repo = %repo.display_path, "claimed repository");
                        let outcome = task.run(&repo).await;
                        let result = OperationResult::new(repo, outcome);
                        if let Some(observer) = &observer {
                            observer(&result.repository, result.is_success());
                        }
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(result_tx);

        for (worker_id, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = joined {
                warn!(worker_id, error = %e, "worker stopped abnormally");
            }
        }

        let mut results = Vec::with_capacity(repos.len());
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        Self::fill_missing(repos, &mut results);
        results.sort_by(|a, b| a.repository.path.cmp(&b.repository.path));
        results
    }

    /// A worker that panics loses the repository it claimed; report it
    /// instead of dropping it.
    fn fill_missing<O>(repos: &[RepositoryRef], results: &mut Vec<OperationResult<O>>) {
        let seen: HashSet<&Path> = results.iter().map(|r| r.repository.path.as_path()).collect();
        let missing: Vec<RepositoryRef> = repos
            .iter()
            .filter(|repo| !seen.contains(repo.path.as_path()))
            .cloned()
            .collect();

        for repo in missing {
            warn!(repo = %repo.display_path, "no result from worker pool");
            let message = format!("worker stopped before finishing {}", repo.display_path);
            results.push(OperationResult::new(repo, Err(TaskError::Incomplete(message))));
        }
    }

    fn notify<O>(&self, result: &OperationResult<O>) {
        if let Some(observer) = &self.observer {
            observer(&result.repository, result.is_success());
        }
    }
}

impl std::fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("parallel", &self.parallel)
            .field("workers", &self.workers)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
