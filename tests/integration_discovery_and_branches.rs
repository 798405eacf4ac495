//! Discovery, branch inspection and the branch summary against real repositories

mod common;

use std::sync::Arc;

use common::git_fixtures::{commit, detach_head, make_dirty, RepoTree};
use sgit::application::services::discover_repositories;
use sgit::application::use_cases::branch_summary::BranchSummary;
use sgit::application::use_cases::inspect_branches::InspectBranchesTask;
use sgit::application::use_cases::TaskExecutor;
use sgit::domain::entities::run_config::RunConfig;
use sgit::domain::value_objects::exclusion_set::ExclusionSet;
use sgit::infrastructure::git::BranchStatus;
use sgit::infrastructure::GitCli;

/// alpha: clean clone on main, in sync with its upstream.
/// bravo: dirty with a detached HEAD.
/// charlie: a repository excluded by name.
fn scenario() -> RepoTree {
    let ws = RepoTree::new();
    let upstream = ws.init_repo("upstream-src");
    ws.clone_repo(&upstream, "root/alpha");

    let bravo = ws.init_repo("root/bravo");
    commit(&bravo, "lib.rs", "fn lib() {}\n");
    detach_head(&bravo);
    make_dirty(&bravo);

    ws.init_repo("root/charlie");
    ws.plain_dir("root/notes");
    ws
}

fn config(ws: &RepoTree) -> RunConfig {
    RunConfig::new(ws.path("root")).with_exclusions(ExclusionSet::parse("charlie"))
}

#[tokio::test]
async fn test_discovery_honours_exclusions() {
    let ws = scenario();
    let repos = assert_ok!(discover_repositories(&config(&ws)).await);

    let names: Vec<&str> = repos.iter().map(|r| r.display_path.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo"]);
    for repo in &repos {
        assert!(!repo.path.ends_with(".git"));
        assert!(!repo.path.to_string_lossy().contains("charlie"));
    }
}

#[tokio::test]
async fn test_branch_summary_classifies_repositories() {
    let ws = scenario();
    let config = config(&ws);
    let repos = assert_ok!(discover_repositories(&config).await);

    let task = InspectBranchesTask::new(Arc::new(GitCli::new()));
    let results = TaskExecutor::sequential().run_all(&repos, Arc::new(task)).await;
    let summary = BranchSummary::from_results(&results);

    assert_eq!(summary.total, 2);
    assert_eq!(summary.count("main"), 1);
    assert!(summary.errors.is_empty());

    let detached: Vec<&str> = summary.detached.iter().map(|r| r.display_path.as_str()).collect();
    assert_eq!(detached, vec!["bravo"]);
    let dirty: Vec<&str> = summary.dirty.iter().map(|r| r.display_path.as_str()).collect();
    assert_eq!(dirty, vec!["bravo"]);

    let alpha = results[0].value().expect("alpha inspected");
    assert!(!alpha.dirty);
    assert_eq!(alpha.status, Some(BranchStatus::new(0, 0)));
    assert_eq!(alpha.status_text(), "");
}

#[tokio::test]
async fn test_parallel_and_sequential_agree() {
    let ws = scenario();
    let config = config(&ws);
    let repos = assert_ok!(discover_repositories(&config).await);
    let task = Arc::new(InspectBranchesTask::new(Arc::new(GitCli::new())));

    let sequential = TaskExecutor::sequential().run_all(&repos, Arc::clone(&task)).await;
    let parallel = TaskExecutor::parallel(4).run_all(&repos, task).await;

    assert_eq!(sequential.len(), parallel.len());
    for (a, b) in sequential.iter().zip(parallel.iter()) {
        assert_eq!(a.repository, b.repository);
        assert_eq!(a.value(), b.value());
    }
}

#[tokio::test]
async fn test_ahead_of_upstream() {
    let ws = RepoTree::new();
    let upstream = ws.init_repo("upstream-src");
    let clone = ws.clone_repo(&upstream, "root/service");
    commit(&clone, "feature.txt", "local work\n");

    let repos = assert_ok!(discover_repositories(&RunConfig::new(ws.path("root"))).await);
    let task = InspectBranchesTask::new(Arc::new(GitCli::new()));
    let results = TaskExecutor::sequential().run_all(&repos, Arc::new(task)).await;

    let info = results[0].value().expect("service inspected");
    assert_eq!(info.status, Some(BranchStatus::new(1, 0)));
    assert_eq!(info.status_text(), "↑1");
}
