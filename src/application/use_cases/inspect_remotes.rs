use async_trait::async_trait;
use std::sync::Arc;

use crate::application::use_cases::task_executor::{RepositoryTask, TaskError};
use crate::domain::entities::repository::RepositoryRef;
use crate::infrastructure::git::{GitOperations, RemoteMap};

/// Lists the configured remotes of a repository. An empty map is a success.
pub struct InspectRemotesTask {
    git: Arc<dyn GitOperations>,
}

impl InspectRemotesTask {
    pub fn new(git: Arc<dyn GitOperations>) -> Self {
        Self { git }
    }
}

#[async_trait]
impl RepositoryTask for InspectRemotesTask {
    type Output = RemoteMap;

    async fn run(&self, repo: &RepositoryRef) -> Result<RemoteMap, TaskError> {
        Ok(self.git.remotes(&repo.path).await?)
    }
}
