use async_trait::async_trait;
use std::sync::Arc;

use crate::application::use_cases::task_executor::{RepositoryTask, TaskError};
use crate::domain::entities::repository::RepositoryRef;
use crate::infrastructure::git::GitOperations;

/// Fetches every remote and integrates the upstream of the current branch.
/// Succeeds with the name of the branch that was pulled.
pub struct PullRepositoryTask {
    git: Arc<dyn GitOperations>,
}

impl PullRepositoryTask {
    pub fn new(git: Arc<dyn GitOperations>) -> Self {
        Self { git }
    }
}

#[async_trait]
impl RepositoryTask for PullRepositoryTask {
    type Output = String;

    async fn run(&self, repo: &RepositoryRef) -> Result<String, TaskError> {
        let path = repo.path.as_path();
        let branch = self.git.current_branch(path).await?;
        self.git.pull(path).await?;
        Ok(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::{GitError, MockGitOperations};
    use std::path::Path;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("/work/api", Path::new("/work"))
    }

    #[tokio::test]
    async fn test_pull_reports_branch() {
        let mut mock = MockGitOperations::new();
        mock.expect_current_branch()
            .returning(|_| Ok("main".to_string()));
        mock.expect_pull().times(1).returning(|_| Ok(()));

        let branch = PullRepositoryTask::new(Arc::new(mock)).run(&repo()).await.unwrap();
        assert_eq!(branch, "main");
    }

    #[tokio::test]
    async fn test_pull_failure_carries_git_message() {
        let mut mock = MockGitOperations::new();
        mock.expect_current_branch()
            .returning(|_| Ok("main".to_string()));
        mock.expect_pull()
            .returning(|_| Err(GitError::command_failed("git pull", 1, "There is no tracking information")));

        let error = PullRepositoryTask::new(Arc::new(mock)).run(&repo()).await.unwrap_err();
        assert_eq!(error.to_string(), "There is no tracking information");
    }

    #[tokio::test]
    async fn test_unresolvable_head_skips_pull() {
        let mut mock = MockGitOperations::new();
        mock.expect_current_branch()
            .returning(|_| Err(GitError::command_failed("git rev-parse", 128, "bad HEAD")));
        mock.expect_pull().never();

        assert!(PullRepositoryTask::new(Arc::new(mock)).run(&repo()).await.is_err());
    }
}
