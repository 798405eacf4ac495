use std::path::Path;
use tracing::info;

use crate::common::error::SgitError;
use crate::common::result::SgitResult;
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::entities::run_config::RunConfig;
use crate::infrastructure::filesystem::RepositoryLocator;
use crate::infrastructure::git::GitOperations;

/// Discover every repository below `config.root`, honouring its exclusions.
///
/// The walk runs on the blocking pool. Zero repositories is not an error.
pub async fn discover_repositories(config: &RunConfig) -> SgitResult<Vec<RepositoryRef>> {
    let locator = RepositoryLocator::new(config.exclusions.clone());
    let root = config.root.clone();

    let repos = tokio::task::spawn_blocking(move || locator.find_repositories(&root))
        .await
        .map_err(|e| SgitError::internal_error(format!("discovery task failed: {}", e)))??;

    info!(count = repos.len(), "repositories in scope");
    Ok(repos)
}

/// Treat `root` itself as the only repository, failing with
/// [`SgitError::NotARepository`] when it is not inside a work tree.
pub async fn require_repository(git: &dyn GitOperations, root: &Path) -> SgitResult<RepositoryRef> {
    if !git.is_git_repository(root).await {
        return Err(SgitError::not_a_repository(root));
    }
    let root = std::path::absolute(root)?;
    Ok(RepositoryRef::new(root.clone(), &root))
}
