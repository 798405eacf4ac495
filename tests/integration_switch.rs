//! Branch switching in every mode against real repositories

mod common;

use std::path::Path;
use std::sync::Arc;

use common::assertion_helpers::{assert_clean_work_tree, assert_head};
use common::git_fixtures::{create_branch, git, git_output, make_dirty, RepoTree};
use sgit::application::use_cases::switch_branch::{SwitchBranchUseCase, SwitchError, SwitchMode};
use sgit::application::use_cases::TaskExecutor;
use sgit::domain::entities::repository::RepositoryRef;
use sgit::domain::value_objects::branch_name::BranchName;
use sgit::infrastructure::GitCli;

fn switcher(branch: &str, mode: SwitchMode) -> SwitchBranchUseCase {
    SwitchBranchUseCase::new(Arc::new(GitCli::new()), BranchName::new(branch).unwrap(), mode)
}

fn repo_ref(path: &Path) -> RepositoryRef {
    RepositoryRef::new(path, path.parent().unwrap())
}

#[tokio::test]
async fn test_create_missing_branch() {
    let ws = RepoTree::new();
    let repo = ws.init_repo("api");

    let message = assert_ok!(
        switcher("feature/x", SwitchMode::CreateIfMissing)
            .switch(&repo_ref(&repo))
            .await
    );

    assert_eq!(message, "feature/x");
    assert_head(&repo, "feature/x");
}

#[tokio::test]
async fn test_plain_switch_to_missing_branch_fails() {
    let ws = RepoTree::new();
    let repo = ws.init_repo("api");

    let error = assert_err!(switcher("nope", SwitchMode::Plain).switch(&repo_ref(&repo)).await);
    assert!(matches!(error, SwitchError::CheckoutFailed(_)));
    assert!(error.to_string().starts_with("switch failed: "));
    assert_head(&repo, "main");
}

#[tokio::test]
async fn test_force_discard_is_repeatable() {
    let ws = RepoTree::new();
    let repo = ws.init_repo("api");
    create_branch(&repo, "release");
    make_dirty(&repo);

    let use_case = switcher("release", SwitchMode::ForceDiscard { create: false });
    let message = assert_ok!(use_case.switch(&repo_ref(&repo)).await);
    assert_eq!(message, "switched to: release");
    assert_head(&repo, "release");
    assert_clean_work_tree(&repo);

    assert_ok!(use_case.switch(&repo_ref(&repo)).await);
    assert_clean_work_tree(&repo);
}

#[tokio::test]
async fn test_force_discard_reports_checkout_error_after_cleaning() {
    let ws = RepoTree::new();
    let repo = ws.init_repo("api");
    make_dirty(&repo);

    let use_case = switcher("missing", SwitchMode::ForceDiscard { create: false });
    let error = assert_err!(use_case.switch(&repo_ref(&repo)).await);

    assert!(matches!(error, SwitchError::CheckoutAfterDiscardFailed(_)));
    let message = error.to_string();
    assert!(message.starts_with("work tree reset and cleaned; switch failed: "), "{}", message);
    assert!(message.contains("missing"), "{}", message);
    assert_clean_work_tree(&repo);

    // Reset and clean succeed again on the already clean tree
    let error = assert_err!(use_case.switch(&repo_ref(&repo)).await);
    assert!(matches!(error, SwitchError::CheckoutAfterDiscardFailed(_)));
}

#[tokio::test]
async fn test_force_discard_with_create() {
    let ws = RepoTree::new();
    let repo = ws.init_repo("api");
    make_dirty(&repo);

    let message = assert_ok!(
        switcher("hotfix", SwitchMode::ForceDiscard { create: true })
            .switch(&repo_ref(&repo))
            .await
    );
    assert_eq!(message, "created and switched to: hotfix");
    assert_head(&repo, "hotfix");
}

#[tokio::test]
async fn test_track_remote_branch() {
    let ws = RepoTree::new();
    let upstream = ws.init_repo("upstream-src");
    create_branch(&upstream, "develop");
    let clone = ws.clone_repo(&upstream, "clone");

    let message = assert_ok!(
        switcher("origin/develop", SwitchMode::TrackRemote { fetch: true })
            .switch(&repo_ref(&clone))
            .await
    );

    assert_eq!(message, "tracking branch: origin/develop");
    assert_head(&clone, "develop");
    let upstream_ref = git_output(&clone, &["rev-parse", "--abbrev-ref", "develop@{upstream}"]);
    assert_eq!(upstream_ref, "origin/develop");
}

#[tokio::test]
async fn test_track_missing_remote_branch() {
    let ws = RepoTree::new();
    let upstream = ws.init_repo("upstream-src");
    let clone = ws.clone_repo(&upstream, "clone");

    let error = assert_err!(
        switcher("ghost", SwitchMode::TrackRemote { fetch: false })
            .switch(&repo_ref(&clone))
            .await
    );

    assert!(matches!(error, SwitchError::RemoteBranchNotFound { .. }));
    assert_eq!(
        error.to_string(),
        "tracking branch creation failed: remote branch origin/ghost does not exist"
    );
    // No local branch was created
    let branches = git_output(&clone, &["branch", "--list", "ghost"]);
    assert!(branches.is_empty());
}

#[tokio::test]
async fn test_parallel_switch_over_many_repositories() {
    let ws = RepoTree::new();
    let repos: Vec<RepositoryRef> = (0..6)
        .map(|i| {
            let path = ws.init_repo(&format!("root/repo-{}", i));
            RepositoryRef::new(path, &ws.path("root"))
        })
        .collect();
    // One repository already has the branch
    git(&repos[3].path, &["checkout", "-q", "-b", "feature/x"]);
    git(&repos[3].path, &["checkout", "-q", "main"]);

    let use_case = switcher("feature/x", SwitchMode::CreateIfMissing);
    let results = TaskExecutor::parallel(3).run_all(&repos, Arc::new(use_case)).await;

    assert_eq!(results.len(), 6);
    let paths: Vec<_> = results.iter().map(|r| r.repository.path.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);

    for result in &results {
        assert!(result.is_success(), "{:?}", result.error());
        assert_head(&result.repository.path, "feature/x");
    }
}
