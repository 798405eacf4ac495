use std::collections::BTreeMap;

use crate::application::use_cases::inspect_branches::BranchInfo;
use crate::application::use_cases::task_executor::{OperationResult, TaskError};
use crate::domain::entities::repository::RepositoryRef;

/// Aggregated view of a branch inspection run.
///
/// Lists keep the order of the input results. A failed repository only
/// appears in `errors`. Dirty repositories are listed whether detached or not.
#[derive(Debug, Default)]
pub struct BranchSummary<'a> {
    /// Branch name to repository count, successful non-detached results only
    pub branches: BTreeMap<String, usize>,
    pub detached: Vec<&'a RepositoryRef>,
    pub errors: Vec<(&'a RepositoryRef, &'a TaskError)>,
    pub dirty: Vec<&'a RepositoryRef>,
    pub total: usize,
}

impl<'a> BranchSummary<'a> {
    pub fn from_results(results: &'a [OperationResult<BranchInfo>]) -> Self {
        let mut summary = BranchSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            let info = match &result.outcome {
                Ok(info) => info,
                Err(e) => {
                    summary.errors.push((&result.repository, e));
                    continue;
                }
            };

            if info.is_detached() {
                summary.detached.push(&result.repository);
            } else {
                *summary.branches.entry(info.branch.clone()).or_insert(0) += 1;
            }

            if info.dirty {
                summary.dirty.push(&result.repository);
            }
        }

        summary
    }

    /// Repositories on `branch`
    pub fn count(&self, branch: &str) -> usize {
        self.branches.get(branch).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::GitError;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn repo(name: &str) -> RepositoryRef {
        RepositoryRef::new(Path::new("/work").join(name), Path::new("/work"))
    }

    fn ok(name: &str, branch: &str, dirty: bool) -> OperationResult<BranchInfo> {
        OperationResult::new(repo(name), Ok(BranchInfo::new(branch, dirty)))
    }

    fn failed(name: &str) -> OperationResult<BranchInfo> {
        OperationResult::new(
            repo(name),
            Err(TaskError::Git(GitError::command_failed("git", 128, "broken"))),
        )
    }

    fn names(repos: &[&RepositoryRef]) -> Vec<String> {
        repos.iter().map(|r| r.display_path.clone()).collect()
    }

    #[test]
    fn test_partitions_results() {
        let results = vec![
            ok("a", "main", false),
            ok("b", "HEAD", true),
            failed("c"),
            ok("d", "main", true),
            ok("e", "develop", false),
            ok("f", "(detached from v1.0)", false),
        ];

        let summary = BranchSummary::from_results(&results);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.count("main"), 2);
        assert_eq!(summary.count("develop"), 1);
        assert_eq!(summary.count("HEAD"), 0);
        assert_eq!(
            summary.branches.keys().cloned().collect::<Vec<_>>(),
            vec!["develop".to_string(), "main".to_string()]
        );
        assert_eq!(names(&summary.detached), vec!["b", "f"]);
        assert_eq!(names(&summary.dirty), vec!["b", "d"]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].0.display_path, "c");
    }

    #[test]
    fn test_errors_are_excluded_from_other_sets() {
        let results = vec![failed("x"), failed("y")];
        let summary = BranchSummary::from_results(&results);

        assert!(summary.branches.is_empty());
        assert!(summary.detached.is_empty());
        assert!(summary.dirty.is_empty());
        assert_eq!(summary.errors.len(), 2);
    }

    #[test]
    fn test_empty_results() {
        let summary = BranchSummary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.branches.is_empty());
    }
}
