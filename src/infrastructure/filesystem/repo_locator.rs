use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::entities::repository::{RepositoryRef, METADATA_DIR};
use crate::domain::value_objects::exclusion_set::ExclusionSet;

/// Traversal failures. Any of these aborts the whole discovery call.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Discovery root not found: {0}")]
    RootNotFound(String),

    #[error("Discovery root is not a directory: {0}")]
    RootNotDirectory(String),

    #[error("Failed to walk {path}: {source}")]
    WalkFailed {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Finds repository roots below a directory
#[derive(Debug, Clone, Default)]
pub struct RepositoryLocator {
    exclusions: ExclusionSet,
    follow_links: bool,
}

impl RepositoryLocator {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self {
            exclusions,
            follow_links: false,
        }
    }

    /// Follow symbolic links while walking (off by default)
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Walk `root` and return every directory that directly contains a
    /// `.git` directory, sorted by path.
    ///
    /// An excluded entry prunes its whole subtree. The marker directory is
    /// never descended into and never returned itself.
    pub fn find_repositories(&self, root: &Path) -> Result<Vec<RepositoryRef>, DiscoveryError> {
        let root = Self::absolute_root(root)?;
        info!(root = %root.display(), exclusions = ?self.exclusions.patterns(), "discovering repositories");

        let mut found: Vec<PathBuf> = Vec::new();
        let mut walker = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| DiscoveryError::WalkFailed {
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string()),
                source: e,
            })?;

            if self.exclusions.excludes(entry.path()) {
                debug!(path = %entry.path().display(), "excluded");
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            if entry.file_type().is_dir() && entry.file_name() == METADATA_DIR {
                if let Some(repo_root) = entry.path().parent() {
                    debug!(path = %repo_root.display(), "found repository");
                    found.push(repo_root.to_path_buf());
                }
                walker.skip_current_dir();
            }
        }

        found.sort();
        found.dedup();
        info!(count = found.len(), "discovery finished");

        Ok(found
            .into_iter()
            .map(|path| RepositoryRef::new(path, &root))
            .collect())
    }

    /// Whether `path` itself is a repository root
    pub fn is_repository_root(path: &Path) -> bool {
        path.join(METADATA_DIR).is_dir()
    }

    fn absolute_root(root: &Path) -> Result<PathBuf, DiscoveryError> {
        let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DiscoveryError::RootNotFound(root.display().to_string()),
            _ => DiscoveryError::IoError(e),
        })?;
        if !metadata.is_dir() {
            return Err(DiscoveryError::RootNotDirectory(root.display().to_string()));
        }
        Ok(std::path::absolute(root)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn make_repo(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.join(METADATA_DIR).join("refs")).unwrap();
        fs::write(path.join(METADATA_DIR).join("HEAD"), "ref: refs/heads/main\n").unwrap();
        path
    }

    fn names(repos: &[RepositoryRef]) -> Vec<String> {
        repos.iter().map(|r| r.display_path.clone()).collect()
    }

    #[test]
    fn test_finds_nested_repositories_sorted() {
        let temp_dir = TempDir::new().unwrap();
        make_repo(temp_dir.path(), "zeta");
        make_repo(temp_dir.path(), "alpha");
        make_repo(temp_dir.path(), "group/inner");
        fs::create_dir_all(temp_dir.path().join("not-a-repo/src")).unwrap();

        let repos = RepositoryLocator::default()
            .find_repositories(temp_dir.path())
            .unwrap();

        let group_inner = PathBuf::from("group").join("inner").display().to_string();
        assert_eq!(names(&repos), vec!["alpha".to_string(), group_inner, "zeta".to_string()]);
    }

    #[test]
    fn test_never_returns_marker_directory() {
        let temp_dir = TempDir::new().unwrap();
        make_repo(temp_dir.path(), "app");

        let repos = RepositoryLocator::default()
            .find_repositories(temp_dir.path())
            .unwrap();

        assert_eq!(repos.len(), 1);
        assert!(repos
            .iter()
            .all(|r| r.path.file_name().unwrap() != METADATA_DIR));
    }

    #[test]
    fn test_exclusion_prunes_subtree() {
        let temp_dir = TempDir::new().unwrap();
        make_repo(temp_dir.path(), "keep");
        make_repo(temp_dir.path(), "skipped-tree/nested");
        make_repo(temp_dir.path(), "deps/node_modules/pkg");

        let locator = RepositoryLocator::new(ExclusionSet::parse("skipped-tree,node_modules"));
        let repos = locator.find_repositories(temp_dir.path()).unwrap();

        assert_eq!(names(&repos), vec!["keep".to_string()]);
        for repo in &repos {
            let path = repo.path.to_string_lossy();
            assert!(!path.contains("skipped-tree"));
            assert!(!path.contains("node_modules"));
        }
    }

    #[test]
    fn test_root_repository_is_found() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_repo(temp_dir.path(), "single");

        let repos = RepositoryLocator::default().find_repositories(&root).unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].display_path, "single");
        assert!(repos[0].path.is_absolute());
    }

    #[test]
    fn test_empty_tree_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let repos = RepositoryLocator::default()
            .find_repositories(temp_dir.path())
            .unwrap();
        assert!(repos.is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = RepositoryLocator::default().find_repositories(&temp_dir.path().join("gone"));
        assert!(matches!(result, Err(DiscoveryError::RootNotFound(_))));
    }

    #[test]
    fn test_is_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        let repo = make_repo(temp_dir.path(), "app");
        assert!(RepositoryLocator::is_repository_root(&repo));
        assert!(!RepositoryLocator::is_repository_root(temp_dir.path()));
    }
}
