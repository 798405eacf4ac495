use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::application::use_cases::task_executor::{RepositoryTask, TaskError};
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::value_objects::branch_set::BranchSet;
use crate::infrastructure::git::{BranchStatus, GitOperations};

/// Name git reports for the current branch when HEAD is detached
pub const DETACHED_HEAD: &str = "HEAD";

/// Whether a current-branch value denotes a detached HEAD
pub fn is_detached_branch(branch: &str) -> bool {
    branch == DETACHED_HEAD || branch.starts_with("(detached from")
}

/// Branch state of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub branch: String,
    pub dirty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BranchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<BranchSet>,
}

impl BranchInfo {
    pub fn new(branch: impl Into<String>, dirty: bool) -> Self {
        Self {
            branch: branch.into(),
            dirty,
            status: None,
            branches: None,
        }
    }

    pub fn with_status(mut self, status: Option<BranchStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_branches(mut self, branches: BranchSet) -> Self {
        self.branches = Some(branches);
        self
    }

    pub fn is_detached(&self) -> bool {
        is_detached_branch(&self.branch)
    }

    /// `↑N ↓M`, empty without upstream or when in sync
    pub fn status_text(&self) -> String {
        self.status.map(|s| s.to_string()).unwrap_or_default()
    }
}

/// Reads current branch, dirty flag, upstream status and optionally every
/// branch of a repository. Never modifies the repository.
pub struct InspectBranchesTask {
    git: Arc<dyn GitOperations>,
    include_all: bool,
}

impl InspectBranchesTask {
    pub fn new(git: Arc<dyn GitOperations>) -> Self {
        Self {
            git,
            include_all: false,
        }
    }

    /// Also list local, remote-tracking and tag references
    pub fn with_all_branches(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }
}

#[async_trait]
impl RepositoryTask for InspectBranchesTask {
    type Output = BranchInfo;

    async fn run(&self, repo: &RepositoryRef) -> Result<BranchInfo, TaskError> {
        let path = repo.path.as_path();
        let branch = self.git.current_branch(path).await?;
        let dirty = self.git.is_dirty(path).await;

        let status = if is_detached_branch(&branch) {
            None
        } else {
            self.git.branch_status(path, &branch).await
        };

        let mut info = BranchInfo::new(branch, dirty).with_status(status);
        if self.include_all {
            let refs = self.git.all_branches(path).await?;
            info = info.with_branches(BranchSet::partition(refs));
        }
        Ok(info)
    }
}
