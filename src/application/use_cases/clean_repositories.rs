use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::application::use_cases::task_executor::{RepositoryTask, TaskError};
use crate::domain::entities::repository::RepositoryRef;
use crate::infrastructure::git::{GitError, GitOperations};

/// Build output directory removed by a deep clean
pub const TARGET_DIR: &str = "target";

/// Failed step of a clean
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("reset failed: {0}")]
    ResetFailed(#[source] GitError),

    #[error("clean failed: {0}")]
    CleanFailed(#[source] GitError),

    #[error("failed to remove {}: {source}", path.display())]
    RemoveTargetFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a successful clean did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub target_removed: bool,
}

/// Discards every local change: `reset --hard`, `clean -f -d`, then removes
/// `target/` in the repository root when present.
///
/// Irreversible. Callers confirm with the user first.
pub struct CleanRepositoryTask {
    git: Arc<dyn GitOperations>,
    remove_target: bool,
}

impl CleanRepositoryTask {
    pub fn new(git: Arc<dyn GitOperations>) -> Self {
        Self {
            git,
            remove_target: true,
        }
    }

    pub fn with_remove_target(mut self, remove_target: bool) -> Self {
        self.remove_target = remove_target;
        self
    }

    pub async fn clean(&self, repo: &RepositoryRef) -> Result<CleanReport, CleanError> {
        let path = repo.path.as_path();
        self.git
            .reset_hard(path)
            .await
            .map_err(CleanError::ResetFailed)?;
        self.git
            .clean_untracked(path)
            .await
            .map_err(CleanError::CleanFailed)?;

        let mut report = CleanReport::default();
        if self.remove_target {
            let target = path.join(TARGET_DIR);
            if tokio::fs::metadata(&target).await.map(|m| m.is_dir()).unwrap_or(false) {
                debug!(path = %target.display(), "removing build directory");
                tokio::fs::remove_dir_all(&target)
                    .await
                    .map_err(|source| CleanError::RemoveTargetFailed {
                        path: target.clone(),
                        source,
                    })?;
                report.target_removed = true;
            }
        }
        Ok(report)
    }
}

#[async_trait]
impl RepositoryTask for CleanRepositoryTask {
    type Output = CleanReport;

    async fn run(&self, repo: &RepositoryRef) -> Result<CleanReport, TaskError> {
        Ok(self.clean(repo).await?)
    }
}
